use folio_loader::{Effect, HandleId, LoaderConfig};

#[test]
fn partial_config_keeps_defaults() {
    let cfg: LoaderConfig =
        serde_json::from_str(r#"{ "is_mobile": true, "load_timeout_ms": 8000 }"#).unwrap();
    assert!(cfg.is_mobile);
    assert_eq!(cfg.load_timeout_ms, 8_000);
    assert_eq!(cfg.inter_item_delay(), 80);
    assert_eq!(cfg.fallback_delay_ms, 3_000);
    assert_eq!(cfg.excluded_class, "hero-large-image");
}

#[test]
fn empty_object_is_default() {
    let cfg: LoaderConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, LoaderConfig::default());
}

#[test]
fn effects_serialize_with_variant_tags() {
    let json = serde_json::to_value(Effect::BeginLoad {
        handle: HandleId(4),
        src: "img/4.webp".into(),
    })
    .unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "BeginLoad": { "handle": 4, "src": "img/4.webp" } })
    );
}
