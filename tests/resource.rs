use std::fs;
use std::path::PathBuf;

use crate::utils::rand_str;
use remote_config::{Client, ErrorKind, FileResourceLoader, MapResourceLoader, Value, ValueSource};

mod utils;

fn resource_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("remote-config-{}", rand_str(12)));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn json_file() {
    let dir = resource_dir();
    fs::write(dir.join("defaults.json"), r#"{"welcome": "hi", "limit": 5, "beta": true}"#).unwrap();

    let client = Client::builder("key").base_url("http://localhost").resource_loader(Box::new(FileResourceLoader::new(&dir))).build().unwrap();
    client.set_defaults_from_resource("defaults").unwrap();

    assert_eq!(client.get_value_or("welcome", String::default()), "hi");
    assert_eq!(client.get_value_or("limit", 0i64), 5);
    assert!(client.get_value_or("beta", false));
    assert_eq!(client.get_value("limit").source, ValueSource::Default);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn yaml_file_with_extension() {
    let dir = resource_dir();
    fs::write(dir.join("prod.yml"), "ratio: 0.5\nname: prod\n").unwrap();

    let client = Client::builder("key").base_url("http://localhost").resource_loader(Box::new(FileResourceLoader::new(&dir))).build().unwrap();
    client.set_defaults_from_resource("prod.yml").unwrap();
    client.set_defaults_from_resource("prod").unwrap();

    assert_eq!(client.get_value("ratio").value, Some(Value::Float(0.5)));
    assert_eq!(client.get_value("name").value, Some(Value::from("prod")));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_and_invalid_leave_defaults_untouched() {
    let dir = resource_dir();
    fs::write(dir.join("broken.json"), r#"{"nested": {"a": 1}}"#).unwrap();

    let client = Client::builder("key").base_url("http://localhost").resource_loader(Box::new(FileResourceLoader::new(&dir))).defaults([("a", 1)]).build().unwrap();

    let err = client.set_defaults_from_resource("missing").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ResourceNotFound);

    let err = client.set_defaults_from_resource("broken").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidResourceContent);

    let all = client.get_all();
    assert_eq!(all.len(), 1);
    assert_eq!(all["a"].value, Some(Value::Int(1)));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn merges_over_existing_defaults() {
    let client = Client::builder("key")
        .base_url("http://localhost")
        .resource_loader(Box::new(MapResourceLoader::default().with_resource("overrides", [("a", 2)])))
        .defaults([("a", 1), ("b", 1)])
        .build()
        .unwrap();
    client.set_defaults_from_resource("overrides").unwrap();

    assert_eq!(client.get_value("a").value, Some(Value::Int(2)));
    assert_eq!(client.get_value("b").value, Some(Value::Int(1)));
}

#[test]
fn names_outside_the_root_are_not_found() {
    let dir = resource_dir();
    let root = dir.join("resources");
    fs::create_dir_all(&root).unwrap();
    fs::write(dir.join("outside.json"), r#"{"a": 1}"#).unwrap();
    fs::write(root.join("inside.json"), r#"{"b": 1}"#).unwrap();

    let client = Client::builder("key").base_url("http://localhost").resource_loader(Box::new(FileResourceLoader::new(&root))).build().unwrap();

    let err = client.set_defaults_from_resource("../outside.json").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ResourceNotFound);
    let err = client.set_defaults_from_resource("../outside").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ResourceNotFound);
    let absolute = dir.join("outside.json");
    let err = client.set_defaults_from_resource(absolute.to_str().unwrap()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ResourceNotFound);
    assert!(client.get_all().is_empty());

    client.set_defaults_from_resource("./inside").unwrap();
    assert_eq!(client.get_value("b").value, Some(Value::Int(1)));

    fs::remove_dir_all(dir).unwrap();
}
