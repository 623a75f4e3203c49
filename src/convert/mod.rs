//! Markdown and Summary Converters.
//!
//! Both read only the generator's output tree (`summary.txt` and the example
//! files it lists) and render markdown through the templates in `templates/`.

mod markdown;
mod readme;
mod templates;

pub use markdown::{markdown_convert, render_endpoint_page};
pub use readme::{render_readme, summary_convert, SummaryOptions, DEFAULT_BRANCH, DEFAULT_TITLE};
