use minijinja::Environment;

pub(crate) const ENDPOINT_TEMPLATE: &str = "endpoint.md.j2";
pub(crate) const README_TEMPLATE: &str = "readme.md.j2";

/// Escape a value for use inside a markdown table cell.
fn cell(value: String) -> String {
    value.replace('|', "\\|").replace('\n', "<br>")
}

/// Template environment with both documentation templates loaded.
pub(crate) fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_filter("cell", cell);
    env.add_template(ENDPOINT_TEMPLATE, include_str!("../../templates/endpoint.md.j2"))?;
    env.add_template(README_TEMPLATE, include_str!("../../templates/readme.md.j2"))?;
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_escapes_pipes_and_newlines() {
        assert_eq!(cell("a|b\nc".to_string()), "a\\|b<br>c");
    }

    #[test]
    fn test_templates_compile() {
        let env = environment().unwrap();
        assert!(env.get_template(ENDPOINT_TEMPLATE).is_ok());
        assert!(env.get_template(README_TEMPLATE).is_ok());
    }
}
