//! End-to-end tests for project creation.
//!
//! External tools and the network are replaced by the mock runner and a
//! static transport; the side effects stand in for what `git clone` and
//! `tar -x` would leave on disk.

use std::fs;
use std::path::{Path, PathBuf};

use gpc_core::{
    GitReference, GpcError, InputMode, MockCommandRunner, ProjectCreator, ProjectOptions,
    ScriptedPrompter, StaticTransport, TemplateSource,
};
use serde_json::json;
use tempfile::tempdir;

const CONFIG: &str = r#"templates:
  - "*.txt"
variables:
  - name: Name
    description: Who to greet
    default: World
"#;

fn write_template(root: &Path) {
    fs::create_dir_all(root).unwrap();
    fs::write(root.join(".gpc.yml"), CONFIG).unwrap();
    fs::write(root.join("main.txt"), "Hello {{.Name}}").unwrap();
    fs::write(root.join("README.md"), "Readme for {{.Name}}").unwrap();
}

fn directory_options(temp: &Path) -> (PathBuf, ProjectOptions) {
    let tpl = temp.join("tpl");
    write_template(&tpl);
    let out = temp.join("out");
    (out.clone(), ProjectOptions::new(TemplateSource::Directory(tpl), out))
}

#[test]
fn test_directory_template_uses_defaults() {
    let temp = tempdir().unwrap();
    let (out, options) = directory_options(temp.path());

    let runner = MockCommandRunner::new();
    let transport = StaticTransport::default();
    let prompter = ScriptedPrompter::default();
    let report = ProjectCreator::new(&runner, &transport, &prompter)
        .create(&options)
        .unwrap();

    assert_eq!(fs::read_to_string(out.join("main.txt")).unwrap(), "Hello World");
    assert_eq!(
        fs::read_to_string(out.join("README.md")).unwrap(),
        "Readme for {{.Name}}"
    );
    assert_eq!(report.variables.get("Name"), Some(&json!("World")));
    assert_eq!(report.rendered_files, vec![out.join("main.txt")]);
    assert_eq!(runner.call_count(), 0);
}

#[test]
fn test_inline_data_overrides_default() {
    let temp = tempdir().unwrap();
    let (out, options) = directory_options(temp.path());
    let options = options.with_data(r#"{"Name":"Ada"}"#);

    let runner = MockCommandRunner::new();
    let transport = StaticTransport::default();
    let prompter = ScriptedPrompter::default();
    ProjectCreator::new(&runner, &transport, &prompter)
        .create(&options)
        .unwrap();

    assert_eq!(fs::read_to_string(out.join("main.txt")).unwrap(), "Hello Ada");
}

#[test]
fn test_yaml_inline_data() {
    let temp = tempdir().unwrap();
    let (out, options) = directory_options(temp.path());
    let options = options.with_data("Name: Grace");

    let runner = MockCommandRunner::new();
    let transport = StaticTransport::default();
    let prompter = ScriptedPrompter::default();
    ProjectCreator::new(&runner, &transport, &prompter)
        .create(&options)
        .unwrap();

    assert_eq!(fs::read_to_string(out.join("main.txt")).unwrap(), "Hello Grace");
}

#[test]
fn test_interactive_prompt_answer() {
    let temp = tempdir().unwrap();
    let (out, options) = directory_options(temp.path());
    let options = options.interactive(true).input_mode(InputMode::Text);

    let runner = MockCommandRunner::new();
    let transport = StaticTransport::default();
    let prompter = ScriptedPrompter::new(["Linus"]);
    ProjectCreator::new(&runner, &transport, &prompter)
        .create(&options)
        .unwrap();

    assert_eq!(fs::read_to_string(out.join("main.txt")).unwrap(), "Hello Linus");
    assert_eq!(prompter.asked(), vec!["Who to greet (World): "]);
}

#[test]
fn test_interactive_empty_answer_keeps_default() {
    let temp = tempdir().unwrap();
    let (out, options) = directory_options(temp.path());
    let options = options.interactive(true);

    let runner = MockCommandRunner::new();
    let transport = StaticTransport::default();
    let prompter = ScriptedPrompter::new([""]);
    ProjectCreator::new(&runner, &transport, &prompter)
        .create(&options)
        .unwrap();

    assert_eq!(fs::read_to_string(out.join("main.txt")).unwrap(), "Hello World");
}

#[test]
fn test_existing_destination_is_left_untouched() {
    let temp = tempdir().unwrap();
    let (out, options) = directory_options(temp.path());
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("main.txt"), "mine").unwrap();

    let runner = MockCommandRunner::new();
    let transport = StaticTransport::default();
    let prompter = ScriptedPrompter::default();
    let err = ProjectCreator::new(&runner, &transport, &prompter)
        .create(&options)
        .unwrap_err();

    assert!(matches!(err, GpcError::DestinationExists(_)));
    assert!(err.to_string().contains("directory already exists"));
    assert_eq!(fs::read_to_string(out.join("main.txt")).unwrap(), "mine");
}

#[test]
fn test_overwrite_flag_allows_existing_destination() {
    let temp = tempdir().unwrap();
    let (out, options) = directory_options(temp.path());
    fs::create_dir_all(&out).unwrap();
    let options = options.overwrite(true);

    let runner = MockCommandRunner::new();
    let transport = StaticTransport::default();
    let prompter = ScriptedPrompter::default();
    ProjectCreator::new(&runner, &transport, &prompter)
        .create(&options)
        .unwrap();

    assert_eq!(fs::read_to_string(out.join("main.txt")).unwrap(), "Hello World");
}

#[test]
fn test_template_without_config_is_copied_verbatim() {
    let temp = tempdir().unwrap();
    let tpl = temp.path().join("tpl");
    fs::create_dir_all(&tpl).unwrap();
    fs::write(tpl.join("main.txt"), "Hello {{.Name}}").unwrap();
    let out = temp.path().join("out");

    let runner = MockCommandRunner::new();
    let transport = StaticTransport::default();
    let prompter = ScriptedPrompter::default();
    let report = ProjectCreator::new(&runner, &transport, &prompter)
        .create(&ProjectOptions::new(TemplateSource::Directory(tpl), &out))
        .unwrap();

    assert!(report.config.is_empty());
    assert!(report.variables.is_empty());
    assert!(report.rendered_files.is_empty());
    assert_eq!(fs::read_to_string(out.join("main.txt")).unwrap(), "Hello {{.Name}}");
}

#[test]
fn test_missing_source_directory() {
    let temp = tempdir().unwrap();
    let options = ProjectOptions::new(
        TemplateSource::Directory(temp.path().join("missing")),
        temp.path().join("out"),
    );

    let runner = MockCommandRunner::new();
    let transport = StaticTransport::default();
    let prompter = ScriptedPrompter::default();
    let err = ProjectCreator::new(&runner, &transport, &prompter)
        .create(&options)
        .unwrap_err();

    assert!(matches!(err, GpcError::SourceNotFound(_)));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_git_template() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("out");
    let runner = MockCommandRunner::new().with_side_effect(|call| {
        let dest = PathBuf::from(call.args.last().unwrap());
        write_template(&dest);
        fs::create_dir_all(dest.join(".git")).unwrap();
        fs::write(dest.join(".git/notes.txt"), "{{ not a template").unwrap();
        Ok(())
    });
    let transport = StaticTransport::default();
    let prompter = ScriptedPrompter::default();
    let source =
        TemplateSource::Git(GitReference::new("https://example.com/tpl.git").branch("main"));

    ProjectCreator::new(&runner, &transport, &prompter)
        .create(&ProjectOptions::new(source, &out))
        .unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].args[..3], ["clone", "--branch", "main"]);
    assert_eq!(fs::read_to_string(out.join("main.txt")).unwrap(), "Hello World");
    assert_eq!(
        fs::read_to_string(out.join(".git/notes.txt")).unwrap(),
        "{{ not a template"
    );
}

#[test]
fn test_download_template() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("out");
    let runner = MockCommandRunner::new().with_side_effect(|call| {
        assert_eq!(call.program, "tar");
        let dest = PathBuf::from(&call.args[3]);
        write_template(&dest);
        Ok(())
    });
    let transport = StaticTransport::new(Some("application/x-xz"), b"archive".to_vec());
    let prompter = ScriptedPrompter::default();
    let source = TemplateSource::Download("https://example.com/releases/tpl".to_string());

    ProjectCreator::new(&runner, &transport, &prompter)
        .create(&ProjectOptions::new(source, &out).with_data(r#"{"Name":"Ada"}"#))
        .unwrap();

    assert_eq!(runner.calls()[0].args[0], "-xJf");
    assert_eq!(fs::read_to_string(out.join("main.txt")).unwrap(), "Hello Ada");
}

#[test]
fn test_zip_download_is_rejected() {
    let temp = tempdir().unwrap();
    let out = temp.path().join("out");
    let runner = MockCommandRunner::new();
    let transport = StaticTransport::new(Some("application/zip"), b"PK".to_vec());
    let prompter = ScriptedPrompter::default();
    let source = TemplateSource::Download("https://example.com/tpl.zip".to_string());

    let err = ProjectCreator::new(&runner, &transport, &prompter)
        .create(&ProjectOptions::new(source, &out))
        .unwrap_err();

    assert!(matches!(err, GpcError::UnsupportedFileType { .. }));
    assert!(err.to_string().contains("unsupported file type: application/zip"));
    assert!(!out.exists());
}

#[test]
fn test_render_failure_leaves_fetched_tree() {
    let temp = tempdir().unwrap();
    let (out, options) = directory_options(temp.path());
    fs::write(temp.path().join("tpl/zz.txt"), "broken {{ .Name").unwrap();

    let runner = MockCommandRunner::new();
    let transport = StaticTransport::default();
    let prompter = ScriptedPrompter::default();
    let err = ProjectCreator::new(&runner, &transport, &prompter)
        .create(&options)
        .unwrap_err();

    assert!(matches!(err, GpcError::TemplateParse { .. }));
    assert_eq!(fs::read_to_string(out.join("main.txt")).unwrap(), "Hello World");
    assert_eq!(fs::read_to_string(out.join("zz.txt")).unwrap(), "broken {{ .Name");
}

#[test]
fn test_conditionals_and_undeclared_variables() {
    let temp = tempdir().unwrap();
    let (out, options) = directory_options(temp.path());
    fs::write(
        temp.path().join("tpl/notes.txt"),
        "{{if .Name}}for {{.Name}}{{else}}anonymous{{end}}; owner={{.Owner}}",
    )
    .unwrap();

    let runner = MockCommandRunner::new();
    let transport = StaticTransport::default();
    let prompter = ScriptedPrompter::default();
    ProjectCreator::new(&runner, &transport, &prompter)
        .create(&options)
        .unwrap();

    assert_eq!(
        fs::read_to_string(out.join("notes.txt")).unwrap(),
        "for World; owner=<no value>"
    );
}
