//! Integration tests for invocation verification: exact counts, filtered
//! narrowing, access streams, and failure diagnostics.

use specimen::{prelude::*, Result};

fn audit_interface(registry: &std::sync::Arc<TypeRegistry>) -> Result<TypeToken> {
    let i4 = registry.primitive(PrimitiveKind::I4);
    let string = registry.primitive(PrimitiveKind::String);
    DescriptorBuilder::interface(registry, "IAuditLog")
        .property("Sink", string)
        .method("write", &[("level", i4), ("message", string)], None)
        .generic_method("read_as", &[("key", string)], 1, 0)
        .finish()
}

fn built_scope(registry: std::sync::Arc<TypeRegistry>, token: TypeToken) -> Result<(Value, VerificationScope)> {
    Fixture::new(registry, token)?.build_with_scope()
}

#[test]
fn test_called_matches_exact_invocation_counts() -> Result<()> {
    let registry = TypeRegistry::new();
    let audit = audit_interface(&registry)?;

    // Expected count x actual count, only the diagonal passes
    for expected in 0..3usize {
        for actual in 0..3usize {
            let (built, scope) = built_scope(registry.clone(), audit)?;
            let mock = built.as_mock().unwrap();
            for n in 0..actual {
                mock.call(
                    "write",
                    &[Value::I4(n as i32), Value::String("entry".to_string())],
                )?;
            }

            let outcome = scope.verify("write")?.called(expected);
            if expected == actual {
                assert!(outcome.is_ok(), "expected {expected}, made {actual}");
            } else {
                assert!(outcome.is_err(), "expected {expected}, made {actual}");
            }
        }
    }
    Ok(())
}

#[test]
fn test_called_at_least_once() -> Result<()> {
    let registry = TypeRegistry::new();
    let audit = audit_interface(&registry)?;

    let (built, scope) = built_scope(registry.clone(), audit)?;
    assert!(scope.verify("write")?.called_at_least_once().is_err());

    let mock = built.as_mock().unwrap();
    mock.call("write", &[Value::I4(1), Value::String("a".to_string())])?;
    scope.verify("write")?.called_at_least_once()?;

    mock.call("write", &[Value::I4(2), Value::String("b".to_string())])?;
    scope.verify("write")?.called_at_least_once()?;
    Ok(())
}

#[test]
fn test_where_is_narrows_by_argument() -> Result<()> {
    let registry = TypeRegistry::new();
    let audit = audit_interface(&registry)?;

    let (built, scope) = built_scope(registry, audit)?;
    let mock = built.as_mock().unwrap();
    mock.call("write", &[Value::I4(1), Value::String("boot".to_string())])?;
    mock.call("write", &[Value::I4(2), Value::String("boot".to_string())])?;
    mock.call("write", &[Value::I4(2), Value::String("halt".to_string())])?;

    scope
        .verify("write")?
        .where_is("level", Value::I4(2))?
        .called(2)?;
    scope
        .verify("write")?
        .where_is("level", Value::I4(2))?
        .where_is("message", Value::String("halt".to_string()))?
        .called(1)?;
    scope
        .verify("write")?
        .where_is("level", Value::I4(9))?
        .called(0)?;
    Ok(())
}

#[test]
fn test_where_matches_uses_predicates() -> Result<()> {
    let registry = TypeRegistry::new();
    let audit = audit_interface(&registry)?;

    let (built, scope) = built_scope(registry, audit)?;
    let mock = built.as_mock().unwrap();
    for level in [1, 5, 9] {
        mock.call(
            "write",
            &[Value::I4(level), Value::String("entry".to_string())],
        )?;
    }

    scope
        .verify("write")?
        .where_matches("level", |v| v.as_i32().is_some_and(|n| n > 3))?
        .called(2)?;
    Ok(())
}

#[test]
fn test_type_mismatch_excludes_quietly() -> Result<()> {
    let registry = TypeRegistry::new();
    let audit = audit_interface(&registry)?;

    let (built, scope) = built_scope(registry, audit)?;
    let mock = built.as_mock().unwrap();
    mock.call("write", &[Value::I4(1), Value::String("x".to_string())])?;

    // A well-typed but differently typed comparison is not an error
    scope
        .verify("write")?
        .where_is("level", Value::I8(1))?
        .called(0)?;
    Ok(())
}

#[test]
fn test_unknown_parameter_fails_immediately() -> Result<()> {
    let registry = TypeRegistry::new();
    let audit = audit_interface(&registry)?;

    let (_built, scope) = built_scope(registry, audit)?;

    // No invocation history needed; the parameter name itself is invalid
    let outcome = scope.verify("write")?.where_is("severity", Value::I4(1));
    assert!(matches!(
        outcome,
        Err(specimen::Error::UnknownParameter { member, parameter })
            if member == "write" && parameter == "severity"
    ));
    Ok(())
}

#[test]
fn test_unknown_member_fails_at_verify() -> Result<()> {
    let registry = TypeRegistry::new();
    let audit = audit_interface(&registry)?;

    let (_built, scope) = built_scope(registry, audit)?;
    assert!(matches!(
        scope.verify("erase"),
        Err(specimen::Error::UnknownMember { .. })
    ));
    Ok(())
}

#[test]
fn test_getter_and_setter_streams_are_separate() -> Result<()> {
    let registry = TypeRegistry::new();
    let audit = audit_interface(&registry)?;

    let (built, scope) = built_scope(registry, audit)?;
    let mock = built.as_mock().unwrap();
    mock.get("Sink")?;
    mock.set("Sink", Value::String("file".to_string()))?;
    mock.set("Sink", Value::String("syslog".to_string()))?;

    scope.verify("Sink")?.getter().called(1)?;
    scope.verify("Sink")?.setter().called(2)?;
    scope
        .verify("Sink")?
        .setter_of(Value::String("syslog".to_string()))
        .called(1)?;
    scope
        .verify("Sink")?
        .setter_of(Value::String("console".to_string()))
        .called(0)?;
    Ok(())
}

#[test]
fn test_generic_invocations_narrow_by_binding() -> Result<()> {
    let registry = TypeRegistry::new();
    let i4 = registry.primitive(PrimitiveKind::I4);
    let u1 = registry.primitive(PrimitiveKind::U1);
    let audit = audit_interface(&registry)?;

    let (built, scope) = built_scope(registry, audit)?;
    let mock = built.as_mock().unwrap();
    mock.call_generic("read_as", &[i4], &[Value::String("port".to_string())])?;
    mock.call_generic("read_as", &[i4], &[Value::String("ttl".to_string())])?;
    mock.call_generic("read_as", &[u1], &[Value::String("flag".to_string())])?;

    scope.verify("read_as")?.with_type_args(&[i4]).called(2)?;
    scope.verify("read_as")?.with_type_args(&[u1]).called(1)?;
    scope
        .verify("read_as")?
        .with_type_args(&[i4])
        .where_is("key", Value::String("ttl".to_string()))?
        .called(1)?;
    Ok(())
}

#[test]
fn test_overloads_verify_independently() -> Result<()> {
    let registry = TypeRegistry::new();
    let i4 = registry.primitive(PrimitiveKind::I4);
    let string = registry.primitive(PrimitiveKind::String);
    let lookup = DescriptorBuilder::interface(&registry, "ILookup")
        .method("find", &[("id", i4)], Some(string))
        .method("find", &[("name", string)], Some(string))
        .finish()?;

    let (built, scope) = built_scope(registry, lookup)?;
    let mock = built.as_mock().unwrap();
    mock.call("find", &[Value::I4(1)])?;
    mock.call("find", &[Value::I4(2)])?;
    mock.call("find", &[Value::String("alpha".to_string())])?;

    // Each overload keeps its own invocation count
    scope.verify(Selector::method("find", &[i4]))?.called(2)?;
    scope.verify(Selector::method("find", &[string]))?.called(1)?;
    scope
        .verify(Selector::method("find", &[i4]))?
        .where_is("id", Value::I4(2))?
        .called(1)?;

    // A bare name only addresses an unambiguous member
    assert!(matches!(
        scope.verify("find"),
        Err(specimen::Error::AmbiguousMember { .. })
    ));
    assert!(matches!(
        scope.verify(Selector::method("find", &[i4, string])),
        Err(specimen::Error::UnknownMember { .. })
    ));
    Ok(())
}

#[test]
fn test_bound_selector_restricts_to_one_binding() -> Result<()> {
    let registry = TypeRegistry::new();
    let i4 = registry.primitive(PrimitiveKind::I4);
    let u1 = registry.primitive(PrimitiveKind::U1);
    let string = registry.primitive(PrimitiveKind::String);
    let audit = audit_interface(&registry)?;

    let (built, scope) = built_scope(registry, audit)?;
    let mock = built.as_mock().unwrap();
    mock.call_generic("read_as", &[i4], &[Value::String("port".to_string())])?;
    mock.call_generic("read_as", &[u1], &[Value::String("flag".to_string())])?;

    scope
        .verify(Selector::method("read_as", &[string]).bound(&[i4]))?
        .called(1)?;
    scope
        .verify(Selector::method("read_as", &[string]).bound(&[u1]))?
        .where_is("key", Value::String("flag".to_string()))?
        .called(1)?;
    Ok(())
}

#[test]
fn test_failure_message_states_expectation_and_observation() -> Result<()> {
    let registry = TypeRegistry::new();
    let audit = audit_interface(&registry)?;

    let (built, scope) = built_scope(registry, audit)?;
    let mock = built.as_mock().unwrap();
    mock.call("write", &[Value::I4(1), Value::String("x".to_string())])?;

    let error = scope.verify("write")?.called(4).unwrap_err();
    let message = error.to_string();
    assert!(message.contains("IAuditLog"), "got: {message}");
    assert!(message.contains("write"), "got: {message}");
    assert!(message.contains('4'), "got: {message}");
    assert!(message.contains('1'), "got: {message}");
    Ok(())
}

#[test]
fn test_scope_of_rebinds_to_a_built_value() -> Result<()> {
    let registry = TypeRegistry::new();
    let audit = audit_interface(&registry)?;

    let mut fixture = Fixture::new(registry, audit)?;
    let built = fixture.build()?;
    built
        .as_mock()
        .unwrap()
        .call("write", &[Value::I4(1), Value::String("x".to_string())])?;

    // A scope opened later sees the same record
    let scope = VerificationScope::of(&built)?;
    scope.verify("write")?.called(1)?;
    Ok(())
}
