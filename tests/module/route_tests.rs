//! Route activation tests

use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::test_utils::*;
use module_loader::{
    ModuleDefinition, ModuleError, RouteError, RouteOutcome, RouteResolver, RouteTable,
};

fn resolver(fixture: &ModuleTestFixture) -> (RouteResolver, Arc<Mutex<module_loader::ModuleEngine>>) {
    let table = RouteTable::from_json_str(
        r#"{
            "routes": {
                "/": {"templateUrl": "views/home.html", "dependencies": ["home"]},
                "/admin": {"templateUrl": "views/admin.html", "dependencies": ["admin", "home"]},
                "/about": {"templateUrl": "views/about.html"},
                "/broken": {"templateUrl": "views/broken.html", "dependencies": ["broken"]}
            },
            "defaultRoutePaths": "/"
        }"#,
    )
    .unwrap();
    let engine = Arc::new(Mutex::new(fixture.engine()));
    (RouteResolver::new(table, Arc::clone(&engine)), engine)
}

fn fixture() -> ModuleTestFixture {
    let mut fixture = ModuleTestFixture::new();
    fixture
        .module("home", &["external"])
        .module("external", &[])
        .module("admin", &["home"])
        .define(ModuleDefinition::new("broken").declare(module_loader::Declaration::new(
            "bogus-provider",
            "register",
            vec![json!("x")],
        )));
    fixture
}

#[tokio::test]
async fn test_route_activation_loads_dependencies() {
    let (resolver, engine) = resolver(&fixture());

    let outcome = resolver.resolve("/").await.unwrap();
    let RouteOutcome::Activated(activation) = outcome else {
        panic!("expected activation");
    };

    assert_eq!(activation.template_url, "views/home.html");
    assert_eq!(activation.modules.len(), 1);
    assert_eq!(activation.modules[0].name(), "home");

    let engine = engine.lock().await;
    assert!(engine.is_loaded("home"));
    assert_eq!(controllers(&engine), vec!["externalCtrl", "homeCtrl"]);
}

#[tokio::test]
async fn test_second_route_reuses_loaded_modules() {
    let (resolver, engine) = resolver(&fixture());

    resolver.resolve("/").await.unwrap();
    let RouteOutcome::Activated(activation) = resolver.resolve("/admin").await.unwrap() else {
        panic!("expected activation");
    };

    let names: Vec<&str> = activation.modules.iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["admin", "home"]);
    assert_eq!(
        controllers(&*engine.lock().await),
        vec!["externalCtrl", "homeCtrl", "adminCtrl"]
    );
}

#[tokio::test]
async fn test_route_without_dependencies() {
    let (resolver, _) = resolver(&fixture());
    let RouteOutcome::Activated(activation) = resolver.resolve("/about").await.unwrap() else {
        panic!("expected activation");
    };
    assert!(activation.modules.is_empty());
}

#[tokio::test]
async fn test_unknown_path_redirects_to_default() {
    let (resolver, _) = resolver(&fixture());
    match resolver.resolve("/nowhere").await.unwrap() {
        RouteOutcome::Redirect { to } => assert_eq!(to, "/"),
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_path_without_default() {
    let engine = Arc::new(Mutex::new(fixture().engine()));
    let resolver = RouteResolver::new(RouteTable::default(), engine);

    let err = resolver.resolve("/nowhere").await.unwrap_err();
    assert!(matches!(err, RouteError::NotFound(ref path) if path == "/nowhere"));
}

#[tokio::test]
async fn test_failed_dependencies_block_route() {
    let (resolver, engine) = resolver(&fixture());

    let err = resolver.resolve("/broken").await.unwrap_err();
    match err {
        RouteError::Module(source) => {
            assert!(matches!(source.root_cause(), ModuleError::UnsupportedProvider(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!engine.lock().await.is_loaded("broken"));
}
