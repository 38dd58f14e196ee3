use super::*;

const LOOKUP_BODY: &str = r#"{
    "data": {
        "id": "cPZ582I9Mxtk6crJ37",
        "title": "Excited Dance GIF",
        "images": {
            "original": {
                "url": "https://media.example/cPZ582I9Mxtk6crJ37.gif",
                "width": "480",
                "height": "270"
            }
        }
    }
}"#;

#[test]
fn parse_lookup_extracts_payload() {
    let payload = parse_lookup(LOOKUP_BODY).unwrap();
    assert_eq!(payload.id, "cPZ582I9Mxtk6crJ37");
    assert_eq!(payload.title, "Excited Dance GIF");
    assert_eq!(payload.url, "https://media.example/cPZ582I9Mxtk6crJ37.gif");
    assert_eq!((payload.width, payload.height), (480, 270));
}

#[test]
fn parse_lookup_tolerates_missing_optional_fields() {
    let body = r#"{
        "data": {
            "id": "x",
            "images": { "original": { "url": "https://media.example/x.gif" } }
        }
    }"#;
    let payload = parse_lookup(body).unwrap();
    assert_eq!(payload.title, "");
    assert_eq!((payload.width, payload.height), (0, 0));
}

#[test]
fn parse_lookup_rejects_malformed_body() {
    assert!(matches!(parse_lookup("{}"), Err(GifError::Parse(_))));
    assert!(matches!(parse_lookup("not json"), Err(GifError::Parse(_))));
}

#[test]
fn non_numeric_dimensions_fall_back_to_zero() {
    let body = r#"{
        "data": {
            "id": "x",
            "title": "t",
            "images": { "original": { "url": "u", "width": "wide", "height": "" } }
        }
    }"#;
    let payload = parse_lookup(body).unwrap();
    assert_eq!((payload.width, payload.height), (0, 0));
}

#[test]
fn payload_serde_round_trip() {
    let payload = parse_lookup(LOOKUP_BODY).unwrap();
    let json = serde_json::to_string(&payload).unwrap();
    let back: GifPayload = serde_json::from_str(&json).unwrap();
    assert_eq!(back, payload);
}
