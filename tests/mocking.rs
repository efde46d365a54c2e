//! Integration tests for mock adapters built by fixtures: interception,
//! configured answers, generic bindings, and callbacks.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use specimen::{prelude::*, Result};

/// A repository-style interface with overloads, a property, and a generic
/// method.
fn repository(registry: &Arc<TypeRegistry>) -> Result<TypeToken> {
    let i4 = registry.primitive(PrimitiveKind::I4);
    let string = registry.primitive(PrimitiveKind::String);
    DescriptorBuilder::interface(registry, "IRepository")
        .property("ConnectionString", string)
        .method("find", &[("id", i4)], Some(string))
        .method("find", &[("name", string)], Some(string))
        .method("save", &[("payload", string)], None)
        .generic_method("get_setting", &[], 1, 0)
        .finish()
}

#[test]
fn test_interface_root_builds_as_mock() -> Result<()> {
    let registry = TypeRegistry::new();
    let repo = repository(&registry)?;

    let mut fixture = Fixture::new(registry, repo)?;
    let built = fixture.build()?;
    let mock = built.as_mock().expect("interface roots build as mocks");
    assert_eq!(mock.type_name(), "IRepository");
    assert!(mock.record().is_empty());
    Ok(())
}

#[test]
fn test_unconfigured_calls_answer_kind_defaults() -> Result<()> {
    let registry = TypeRegistry::new();
    let repo = repository(&registry)?;

    let mut fixture = Fixture::new(registry, repo)?;
    let built = fixture.build()?;
    let mock = built.as_mock().unwrap();

    // String-returning method: empty string, not null
    let found = mock.call("find", &[Value::I4(1)])?;
    assert_eq!(found, Value::String(String::new()));

    // Void method: null
    assert_eq!(mock.call("save", &[Value::String("x".into())])?, Value::Null);

    // Property get: kind default
    assert_eq!(mock.get("ConnectionString")?, Value::String(String::new()));
    Ok(())
}

#[test]
fn test_configured_method_answers_fixed_value() -> Result<()> {
    let registry = TypeRegistry::new();
    let i4 = registry.primitive(PrimitiveKind::I4);
    let repo = repository(&registry)?;

    let mut fixture = Fixture::new(registry, repo)?;
    fixture.with(
        &Selector::method("find", &[i4]),
        Behavior::value(Value::String("row-1".to_string())),
    )?;

    let built = fixture.build()?;
    let mock = built.as_mock().unwrap();
    assert_eq!(
        mock.call("find", &[Value::I4(1)])?,
        Value::String("row-1".to_string())
    );
    Ok(())
}

#[test]
fn test_overloads_are_configured_independently() -> Result<()> {
    let registry = TypeRegistry::new();
    let i4 = registry.primitive(PrimitiveKind::I4);
    let string = registry.primitive(PrimitiveKind::String);
    let repo = repository(&registry)?;

    let mut fixture = Fixture::new(registry, repo)?;
    fixture
        .with(
            &Selector::method("find", &[i4]),
            Behavior::value(Value::String("by-id".to_string())),
        )?
        .with(
            &Selector::method("find", &[string]),
            Behavior::value(Value::String("by-name".to_string())),
        )?;

    let built = fixture.build()?;
    let mock = built.as_mock().unwrap();
    assert_eq!(
        mock.call("find", &[Value::I4(7)])?,
        Value::String("by-id".to_string())
    );
    assert_eq!(
        mock.call("find", &[Value::String("ada".to_string())])?,
        Value::String("by-name".to_string())
    );
    Ok(())
}

#[test]
fn test_generic_binding_matches_exact_type_args_only() -> Result<()> {
    let registry = TypeRegistry::new();
    let i4 = registry.primitive(PrimitiveKind::I4);
    let u1 = registry.primitive(PrimitiveKind::U1);
    let repo = repository(&registry)?;

    let mut fixture = Fixture::new(registry, repo)?;
    fixture.with(
        &Selector::member("get_setting").bound(&[i4]),
        Behavior::value(Value::I4(8080)),
    )?;

    let built = fixture.build()?;
    let mock = built.as_mock().unwrap();

    // The configured binding answers
    assert_eq!(mock.call_generic("get_setting", &[i4], &[])?, Value::I4(8080));

    // A different binding is not an error; it answers the bound kind's default
    assert_eq!(mock.call_generic("get_setting", &[u1], &[])?, Value::U1(0));

    // Both interceptions were recorded regardless
    assert_eq!(mock.record().len(), 2);
    Ok(())
}

#[test]
fn test_open_configuration_answers_any_binding() -> Result<()> {
    let registry = TypeRegistry::new();
    let i4 = registry.primitive(PrimitiveKind::I4);
    let u1 = registry.primitive(PrimitiveKind::U1);
    let repo = repository(&registry)?;

    let mut fixture = Fixture::new(registry, repo)?;
    fixture.with(
        &Selector::member("get_setting"),
        Behavior::value(Value::I4(-1)),
    )?;

    let built = fixture.build()?;
    let mock = built.as_mock().unwrap();
    assert_eq!(mock.call_generic("get_setting", &[i4], &[])?, Value::I4(-1));
    assert_eq!(mock.call_generic("get_setting", &[u1], &[])?, Value::I4(-1));
    Ok(())
}

#[test]
fn test_callback_observes_arguments_without_changing_result() -> Result<()> {
    let registry = TypeRegistry::new();
    let repo = repository(&registry)?;

    let observed = Arc::new(AtomicUsize::new(0));
    let hook_counter = observed.clone();

    let mut fixture = Fixture::new(registry, repo)?;
    fixture.with(
        &Selector::member("save"),
        Behavior::callback(move |args| {
            assert_eq!(args.len(), 1);
            hook_counter.fetch_add(1, Ordering::SeqCst);
        }),
    )?;

    let built = fixture.build()?;
    let mock = built.as_mock().unwrap();
    let result = mock.call("save", &[Value::String("payload".to_string())])?;
    assert_eq!(result, Value::Null);
    assert_eq!(observed.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn test_generator_answers_per_interception() -> Result<()> {
    let registry = TypeRegistry::new();
    let i4 = registry.primitive(PrimitiveKind::I4);
    let repo = repository(&registry)?;

    let next = Arc::new(AtomicUsize::new(0));
    let factory_counter = next.clone();

    let mut fixture = Fixture::new(registry, repo)?;
    fixture.with(
        &Selector::method("find", &[i4]),
        Behavior::from_fn(move || {
            let n = factory_counter.fetch_add(1, Ordering::SeqCst);
            Value::String(format!("row-{n}"))
        }),
    )?;

    let built = fixture.build()?;
    let mock = built.as_mock().unwrap();
    assert_eq!(
        mock.call("find", &[Value::I4(1)])?,
        Value::String("row-0".to_string())
    );
    assert_eq!(
        mock.call("find", &[Value::I4(2)])?,
        Value::String("row-1".to_string())
    );
    Ok(())
}

#[test]
fn test_property_roundtrip_is_recorded() -> Result<()> {
    let registry = TypeRegistry::new();
    let repo = repository(&registry)?;

    let mut fixture = Fixture::new(registry, repo)?;
    let built = fixture.build()?;
    let mock = built.as_mock().unwrap();

    mock.set("ConnectionString", Value::String("dsn".to_string()))?;
    mock.get("ConnectionString")?;

    assert_eq!(mock.record().len(), 2);
    let set = mock.record().entry(0).unwrap();
    assert_eq!(set.access, AccessKind::Set);
    assert_eq!(set.arg("value"), Some(&Value::String("dsn".to_string())));
    let get = mock.record().entry(1).unwrap();
    assert_eq!(get.access, AccessKind::Get);
    Ok(())
}

#[test]
fn test_each_built_mock_records_separately() -> Result<()> {
    let registry = TypeRegistry::new();
    let repo = repository(&registry)?;

    let mut fixture = Fixture::new(registry, repo)?;
    let first = fixture.build()?;
    let second = fixture.build()?;

    first.as_mock().unwrap().call("find", &[Value::I4(1)])?;
    assert_eq!(first.as_mock().unwrap().record().len(), 1);
    assert!(second.as_mock().unwrap().record().is_empty());
    Ok(())
}

#[test]
fn test_unknown_method_is_rejected() -> Result<()> {
    let registry = TypeRegistry::new();
    let repo = repository(&registry)?;

    let mut fixture = Fixture::new(registry, repo)?;
    let built = fixture.build()?;
    let mock = built.as_mock().unwrap();
    assert!(matches!(
        mock.call("purge", &[]),
        Err(specimen::Error::UnknownMember { .. })
    ));
    Ok(())
}
