//! Capability provider tests
//!
//! Host-supplied providers, the fixed operation interface, and provider
//! failures surfacing through a load.

use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

use super::test_utils::*;
use module_loader::module::TableProvider;
use module_loader::{
    CapabilityProvider, Declaration, LoaderConfig, ModuleDefinition, ModuleEngine, ModuleError,
    ProviderKind, ProviderMap,
};

/// Directive provider that records calls and rejects directives without a body
struct StrictDirectiveProvider {
    calls: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
}

impl CapabilityProvider for StrictDirectiveProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Directive
    }

    fn invoke(&mut self, operation: &str, arguments: &[Value]) -> Result<(), ModuleError> {
        if arguments.len() < 2 {
            return Err(ModuleError::InvalidDeclaration(
                "directive needs a name and a definition".to_string(),
            ));
        }
        self.calls
            .lock()
            .push((operation.to_string(), arguments.to_vec()));
        Ok(())
    }
}

fn engine_with_strict_directives(
    fixture: &ModuleTestFixture,
) -> (ModuleEngine, Arc<Mutex<Vec<(String, Vec<Value>)>>>) {
    let table = shared_table();
    let calls = Arc::new(Mutex::new(Vec::new()));

    let mut providers = ProviderMap::new();
    providers.insert(Box::new(TableProvider::new(ProviderKind::Controller, Arc::clone(&table))));
    providers.insert(Box::new(StrictDirectiveProvider {
        calls: Arc::clone(&calls),
    }));

    let engine = ModuleEngine::with_providers(
        fixture.registry.clone(),
        LoaderConfig::default(),
        providers,
        table,
    )
    .unwrap();
    (engine, calls)
}

#[test]
fn test_host_provider_receives_arguments_verbatim() {
    let mut fixture = ModuleTestFixture::new();
    fixture.define(
        ModuleDefinition::new("widgets")
            .directive("myWidget", json!({"restrict": "E", "template": "<div/>"})),
    );
    let (mut engine, calls) = engine_with_strict_directives(&fixture);

    engine.load("widgets").unwrap();

    let calls = calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "directive");
    assert_eq!(
        calls[0].1,
        vec![json!("myWidget"), json!({"restrict": "E", "template": "<div/>"})]
    );
}

#[test]
fn test_provider_failure_is_annotated() {
    let mut fixture = ModuleTestFixture::new();
    fixture.define(ModuleDefinition::new("widgets").declare(Declaration::new(
        "directive-provider",
        "directive",
        vec![json!("bare")],
    )));
    let (mut engine, calls) = engine_with_strict_directives(&fixture);

    let err = engine.load("widgets").unwrap_err();

    assert_eq!(
        err.to_string(),
        "Invalid declaration: directive needs a name and a definition from widgets"
    );
    assert!(calls.lock().is_empty());
    assert!(!engine.is_loaded("widgets"));
}

#[test]
fn test_kind_missing_from_host_map_is_unsupported() {
    let mut fixture = ModuleTestFixture::new();
    fixture.define(ModuleDefinition::new("filters").filter("upper", json!({})));
    let (mut engine, _) = engine_with_strict_directives(&fixture);

    let err = engine.load("filters").unwrap_err();
    assert_eq!(err.to_string(), "unsupported provider filter-provider from filters");
}

#[test]
fn test_operation_outside_interface_is_rejected() {
    let mut fixture = ModuleTestFixture::new();
    fixture.define(ModuleDefinition::new("odd").declare(Declaration::new(
        "controller-provider",
        "directive",
        vec![json!("OddCtrl")],
    )));
    let mut engine = fixture.engine();

    let err = engine.load("odd").unwrap_err();
    assert!(matches!(
        err.root_cause(),
        ModuleError::UnsupportedOperation { provider: ProviderKind::Controller, .. }
    ));
    assert!(controllers(&engine).is_empty());
}

#[test]
fn test_every_standard_kind_registers() {
    let mut fixture = ModuleTestFixture::new();
    fixture.define(
        ModuleDefinition::new("everything")
            .controller("Ctrl", json!({}))
            .directive("dir", json!({}))
            .filter("flt", json!({}))
            .factory("fac", json!({}))
            .service("svc", json!({}))
            .value("val", json!(1))
            .constant("CONST", json!("x")),
    );
    let mut engine = fixture.engine();

    engine.load("everything").unwrap();

    let table = engine.capabilities();
    let table = table.read();
    let kinds: Vec<ProviderKind> = table.registrations().iter().map(|r| r.kind).collect();
    assert_eq!(kinds, ProviderKind::ALL.to_vec());
    assert_eq!(table.get(ProviderKind::Constant, "CONST").unwrap().payload, vec![json!("x")]);
}
