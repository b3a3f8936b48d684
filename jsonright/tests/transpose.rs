use jsonright::{
    entity, from_json, to_columns, to_entities, to_entities_with, Deserialized, FromRow,
    RaggedPolicy, Row, RowEcho, Streamed, TransposeError, TransposeOptions,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Subscriber {
    id: u32,
    email: String,
}

thread_local! {
    static CALLS: RefCell<Vec<&'static str>> = RefCell::new(Vec::new());
}

impl FromRow for Subscriber {
    type Error = serde_json::Error;

    fn from_row(row: Row) -> Result<Self, Self::Error> {
        CALLS.with(|c| c.borrow_mut().push("from_row"));
        serde_json::from_value(Value::Object(row))
    }

    fn create(row: Row) -> Result<Self, Self::Error> {
        CALLS.with(|c| c.borrow_mut().push("create"));
        serde_json::from_value(Value::Object(row))
    }
}

fn payload() -> Value {
    json!([
        ["id", 1, 2],
        ["email", "ex@am.pl", "sagan@nasa.gov"],
    ])
}

fn subscribers() -> Vec<Subscriber> {
    vec![
        Subscriber {
            id: 1,
            email: "ex@am.pl".into(),
        },
        Subscriber {
            id: 2,
            email: "sagan@nasa.gov".into(),
        },
    ]
}

#[test]
fn test_constructor_and_creator_build_equal_entities() {
    let options = TransposeOptions::default();

    CALLS.with(|c| c.borrow_mut().clear());
    let created = from_json(&payload(), &entity::<Subscriber>(), &options).unwrap();
    assert_eq!(CALLS.with(|c| c.borrow().clone()), vec!["create", "create"]);

    CALLS.with(|c| c.borrow_mut().clear());
    let built = from_json(
        &payload(),
        &entity::<Subscriber>(),
        &options.with_constructor(true),
    )
    .unwrap();
    assert_eq!(CALLS.with(|c| c.borrow().clone()), vec!["from_row", "from_row"]);

    assert_eq!(created, built);
    assert_eq!(created, subscribers());
}

#[test]
fn test_borrowed_columns_are_restartable() {
    let columns = vec![
        vec![json!("id"), json!(1), json!(2)],
        vec![json!("email"), json!("ex@am.pl"), json!("sagan@nasa.gov")],
    ];
    let first = to_entities(&columns, &RowEcho, false).unwrap();
    let second = to_entities(&columns, &RowEcho, false).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_streamed_columns_are_single_pass() {
    let mut columns = vec![
        Streamed::new(vec![json!("id"), json!(1), json!(2)]),
        Streamed::new(vec![json!("email"), json!("ex@am.pl"), json!("sagan@nasa.gov")]),
    ];
    let factory = Deserialized::<Subscriber>::new();

    let first = to_entities(columns.iter_mut(), &factory, false).unwrap();
    assert_eq!(first, subscribers());

    let second = to_entities(columns.iter_mut(), &factory, false).unwrap();
    assert!(second.is_empty());
}

#[test]
fn test_rows_keep_column_order() {
    let payload = json!([["z", 1, 2], ["a", 3, 4]]);
    let rows = from_json(&payload, &RowEcho, &TransposeOptions::default()).unwrap();
    for (i, row) in rows.iter().enumerate() {
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(row["z"], json!(i + 1));
    }
}

#[test]
fn test_ragged_columns_regression() {
    let tolerant = TransposeOptions::default();
    let rows = from_json(&json!([["a", 1, 2], ["b", "x"]]), &RowEcho, &tolerant).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(Value::Object(rows[0].clone()), json!({"a": 1, "b": "x"}));

    let strict = TransposeOptions::default().with_ragged(RaggedPolicy::Strict);
    let err = from_json(&json!([["a", 1, 2], ["b", "x"]]), &RowEcho, &strict).unwrap_err();
    assert_eq!(err.to_string(), "Column 'b' ran out of values at row 1");
}

#[test]
fn test_entity_failure_returns_no_rows() {
    let payload = json!([["id", 1, "two"], ["email", "ex@am.pl", "sagan@nasa.gov"]]);
    let result = to_entities_with(
        payload.as_array().unwrap(),
        &Deserialized::<Subscriber>::new(),
        &TransposeOptions::default(),
    );
    match result {
        Err(TransposeError::Entity(e)) => assert!(e.is_data()),
        other => panic!("expected an entity error, got {other:?}"),
    }
}

#[test]
fn test_pivot_then_transpose() {
    let columns = to_columns(&subscribers()).unwrap();
    assert_eq!(Value::Array(columns.clone()), payload());

    let back = to_entities(columns, &Deserialized::<Subscriber>::new(), true).unwrap();
    assert_eq!(back, subscribers());
}
