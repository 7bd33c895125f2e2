use super::*;

#[test]
fn data_url_layout() {
    assert_eq!(data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
}

#[test]
fn parse_recovers_mime_and_bytes() {
    let bytes = [0x89u8, b'P', b'N', b'G', 0, 255];
    let url = data_url("image/jpeg", &bytes);
    let (mime, decoded) = parse_data_url(&url).unwrap();
    assert_eq!(mime, "image/jpeg");
    assert_eq!(decoded, bytes);
    assert_eq!(OutputFormat::from_mime_type(&mime), Some(OutputFormat::Jpeg));
}

#[test]
fn parse_rejects_malformed_urls() {
    for url in [
        "image/png;base64,aGk=",
        "data:image/png;base64",
        "data:image/png,aGk=",
        "data:image/png;base64,***",
    ] {
        let err = parse_data_url(url).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Unexpected, "{url}");
    }
}

#[test]
fn file_names_follow_format() {
    assert_eq!(suggested_file_name(OutputFormat::Png), "latex-formula.png");
    assert_eq!(suggested_file_name(OutputFormat::Jpeg), "latex-formula.jpg");
}
