use super::*;

fn sh(script: &str) -> CommandBackend {
    CommandBackend::new(TypesetConfig {
        command: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        ..TypesetConfig::default()
    })
}

#[cfg(unix)]
#[test]
fn stdout_becomes_svg() {
    let backend = sh("cat >/dev/null; printf '<svg xmlns=\"http://www.w3.org/2000/svg\"/>'");
    let svg = backend.typeset("x", &TypesetOptions::default()).unwrap();
    assert_eq!(svg, r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#);
}

#[cfg(unix)]
#[test]
fn request_carries_markup_layout_and_tex_settings() {
    let backend = sh("cat");
    let echoed = backend
        .typeset("a^2 + b^2 = c^2", &TypesetOptions::default())
        .unwrap();
    let v: serde_json::Value = serde_json::from_str(&echoed).unwrap();

    assert_eq!(v["markup"], "a^2 + b^2 = c^2");
    assert_eq!(v["options"]["display"], true);
    assert_eq!(v["options"]["em"], 16.0);
    assert_eq!(v["options"]["ex"], 8.0);
    assert_eq!(v["options"]["containerWidth"], 1280.0);
    assert_eq!(v["tex"]["processEscapes"], true);
    assert_eq!(v["tex"]["displayMath"][0][0], "$$");
    assert_eq!(v["svg"]["fontCache"], "none");
}

#[cfg(unix)]
#[test]
fn nonzero_exit_surfaces_stderr_diagnostic() {
    let backend = sh("cat >/dev/null; echo '[MathJax] Missing close brace' >&2; exit 1");
    let err = backend.typeset("\\frac{", &TypesetOptions::default()).unwrap_err();
    match &err {
        MathpaintError::Typeset(diag) => assert_eq!(diag, "[MathJax] Missing close brace"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.user_message().starts_with("MathJax parse error:"));
}

#[cfg(unix)]
#[test]
fn silent_failure_reports_exit_status() {
    let backend = sh("cat >/dev/null; exit 3");
    let err = backend.typeset("x", &TypesetOptions::default()).unwrap_err();
    assert!(err.to_string().contains("exited with status"));
}

#[test]
fn missing_command_is_unexpected_error() {
    let backend = CommandBackend::new(TypesetConfig {
        command: "mathpaint-definitely-not-installed".to_string(),
        ..TypesetConfig::default()
    });
    let err = backend.typeset("x", &TypesetOptions::default()).unwrap_err();
    assert!(matches!(err, MathpaintError::Other(_)));
    assert!(err.to_string().contains("mathpaint-definitely-not-installed"));
    assert!(!is_command_on_path("mathpaint-definitely-not-installed"));
}
