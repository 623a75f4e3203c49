//! Unit tests for CLI commands

use crate::cli::{Cli, Commands};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_generate_defaults() {
    let cli = Cli::try_parse_from(["diff2curl", "generate", "openapi.yaml", "diff.json"]).unwrap();
    assert!(!cli.verbose);

    match cli.command {
        Commands::Generate {
            openapi,
            diff,
            markdown_dir,
            github_url,
            no_readme,
            ..
        } => {
            assert_eq!(openapi, PathBuf::from("openapi.yaml"));
            assert_eq!(diff, PathBuf::from("diff.json"));
            assert!(markdown_dir.is_none());
            assert!(github_url.is_none());
            assert!(!no_readme);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_with_flags() {
    let cli = Cli::try_parse_from([
        "diff2curl",
        "generate",
        "openapi.yaml",
        "diff.txt",
        "--output-dir",
        "out",
        "--base-url",
        "https://staging.example.com",
        "--markdown-dir",
        "md",
        "--github-url",
        "https://github.com/acme/api/blob",
        "--branch",
        "release",
        "--no-readme",
        "--verbose",
    ])
    .unwrap();
    assert!(cli.verbose);

    match cli.command {
        Commands::Generate {
            output_dir,
            base_url,
            markdown_dir,
            branch,
            no_readme,
            ..
        } => {
            assert_eq!(output_dir, PathBuf::from("out"));
            assert_eq!(base_url.as_deref(), Some("https://staging.example.com"));
            assert_eq!(markdown_dir, Some(PathBuf::from("md")));
            assert_eq!(branch, "release");
            assert!(no_readme);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_markdown_command() {
    let cli = Cli::try_parse_from(["diff2curl", "markdown", "curl_files", "docs"]).unwrap();
    match cli.command {
        Commands::Markdown {
            output_dir,
            markdown_dir,
        } => {
            assert_eq!(output_dir, PathBuf::from("curl_files"));
            assert_eq!(markdown_dir, PathBuf::from("docs"));
        }
        _ => panic!("Expected Markdown command"),
    }
}

#[test]
fn test_summary_command_with_flags() {
    let cli = Cli::try_parse_from([
        "diff2curl",
        "summary",
        "curl_files/summary.txt",
        "-o",
        "README.md",
        "--title",
        "Release 2.0",
        "--no-badges",
        "--no-toc",
    ])
    .unwrap();
    match cli.command {
        Commands::Summary {
            summary_file,
            output,
            title,
            no_badges,
            no_toc,
            ..
        } => {
            assert_eq!(summary_file, PathBuf::from("curl_files/summary.txt"));
            assert_eq!(output, Some(PathBuf::from("README.md")));
            assert_eq!(title, "Release 2.0");
            assert!(no_badges);
            assert!(no_toc);
        }
        _ => panic!("Expected Summary command"),
    }
}

#[test]
fn test_generate_requires_both_inputs() {
    assert!(Cli::try_parse_from(["diff2curl", "generate", "openapi.yaml"]).is_err());
}

#[test]
fn test_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["diff2curl", "serve"]).is_err());
}
