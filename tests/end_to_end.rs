// End-to-end tests: results queued through a connection or a shared database,
// consumed through commands and readers.

pub mod common;

use assert_matches::assert_matches;
use common::int_and_text_table;
use mockable_db::fault::SqlErrorRecord;
use mockable_db::prelude::*;
use mockable_db::queue::QueuedResult;
use proptest::prelude::{Just, Strategy};
use proptest::{prop_assert, prop_assert_eq, proptest};
use std::error::Error as _;

#[test_log::test]
fn test_table_rows_read_in_order() -> MockDbResult<()> {
    let connection = Connection::new();
    connection.results().enqueue_table(Some(int_and_text_table(0..5)?));

    let mut reader = connection.create_command().execute_reader()?;
    for i in 0..5 {
        assert!(reader.read(), "row {i} should be readable");
        assert_eq!(reader.get_i32(0)?, i);
        assert_eq!(reader.get_string(1)?, i.to_string());
    }

    assert!(!reader.read(), "no rows should remain");
    assert!(!reader.next_result()?, "no results should remain");
    assert!(reader.is_closed());
    Ok(())
}

#[test_log::test]
fn test_missing_table_reads_as_empty() -> MockDbResult<()> {
    let connection = Connection::new();
    connection.results().enqueue_table(None);

    let mut reader = connection.create_command().execute_reader()?;
    assert!(!reader.read());
    assert!(!reader.has_rows());
    assert!(!reader.next_result()?);
    Ok(())
}

#[test_log::test]
fn test_multiple_results_keep_fifo_order() -> MockDbResult<()> {
    let connection = Connection::new();
    for value in [1, 2, 3] {
        let table = Table::build(
            [value],
            vec![Column::new("Column0", ValueKind::Int32)],
            |i| Some(vec![Value::from(i)]),
        )?;
        connection.results().enqueue_table(Some(table));
    }

    assert_eq!(connection.results().len(), 3);
    for expected in [1, 2, 3] {
        match connection.results().dequeue()? {
            QueuedResult::Table(table) => assert_eq!(table.cell(0, 0), Some(&Value::Int32(expected))),
            QueuedResult::Fault(_) => panic!("only tables were queued"),
        }
    }
    assert_matches!(connection.results().dequeue(), Err(MockDbError::QueueEmpty));
    Ok(())
}

#[test_log::test]
fn test_empty_results_in_every_mode() -> MockDbResult<()> {
    let connection = Connection::new();
    connection.results().enqueue_empty();
    connection.results().enqueue_empty();
    let command = connection.create_command();

    let mut reader = command.execute_reader()?;
    assert!(!reader.read());
    assert!(reader.next_result()?, "the second empty result should bind");
    assert!(!reader.read());
    assert!(!reader.next_result()?);

    connection.results().enqueue_empty();
    connection.results().enqueue_empty();
    assert_eq!(command.execute_scalar()?, None);
    assert_eq!(command.execute_non_query()?, 0);
    Ok(())
}

#[test_log::test]
fn test_scalar_42_three_ways() -> MockDbResult<()> {
    let connection = Connection::new();
    connection.results().enqueue_scalar(42);
    connection.results().enqueue_scalar(42);
    connection.results().enqueue_scalar(42);
    let command = connection.create_command();

    let mut reader = command.execute_reader()?;
    assert!(reader.read());
    assert_eq!(reader.field_count(), 1);
    assert_eq!(reader.get_i32(0)?, 42);
    assert_eq!(reader.get_ordinal("Scalar")?, 0);
    assert_eq!(reader.get_field_kind(0)?, ValueKind::Int32);
    assert!(!reader.read());
    // The remaining two results belong to the reader's queue too
    drop(reader);

    assert_eq!(command.execute_scalar()?, Some(Value::Int32(42)));
    assert_eq!(command.execute_non_query()?, 42);
    assert!(connection.results().is_empty());
    Ok(())
}

#[test_log::test]
fn test_row_counts_across_next_result() -> MockDbResult<()> {
    let connection = Connection::new();
    connection.results().enqueue_row_count(42);
    connection.results().enqueue_row_count(24);

    let mut reader = connection.create_command().execute_reader()?;
    assert!(reader.read());
    assert_eq!(reader.get_i32(0)?, 42);
    assert_eq!(reader.get_ordinal("RecordsAffected")?, 0);
    assert!(!reader.read());

    assert!(reader.next_result()?);
    assert!(reader.read());
    assert_eq!(reader.get_i32(reader.get_ordinal("recordsaffected")?)?, 24);
    assert!(!reader.read());
    assert!(!reader.next_result()?);
    Ok(())
}

#[test_log::test]
fn test_empty_queue_fails_reader_but_not_scalar_or_non_query() -> MockDbResult<()> {
    let connection = Connection::new();
    let command = connection.create_command();

    assert_matches!(command.execute_reader(), Err(MockDbError::QueueEmpty));
    assert_eq!(command.execute_scalar()?, None);
    assert_eq!(command.execute_non_query()?, 0);
    Ok(())
}

#[test_log::test]
fn test_closed_reader_does_not_consume_later_results() -> MockDbResult<()> {
    let connection = Connection::new();
    connection.results().enqueue_row_count(1);

    let mut reader = connection.create_command().execute_reader()?;
    assert!(!reader.next_result()?);
    assert!(reader.is_closed());

    connection.results().enqueue_scalar(7);
    assert!(!reader.next_result()?, "a closed reader stays closed");
    assert_eq!(connection.results().len(), 1);
    assert_eq!(
        connection.create_command().execute_scalar()?,
        Some(Value::Int32(7))
    );
    Ok(())
}

#[test_log::test]
fn test_long_text_is_chunked_by_2000_characters() -> MockDbResult<()> {
    let text: String = "0123456789".repeat(500);
    let connection = Connection::new();
    connection.results().enqueue_chunked_text(&text);

    let mut reader = connection.create_command().execute_reader()?;
    assert_eq!(reader.get_name(0)?, "Json");

    let mut lengths = Vec::new();
    let mut reassembled = String::new();
    while reader.read() {
        let chunk = reader.get_string(0)?;
        lengths.push(chunk.chars().count());
        reassembled.push_str(chunk);
    }

    assert_eq!(lengths, vec![2000, 2000, 1000]);
    assert_eq!(reassembled, text);
    Ok(())
}

#[test_log::test]
fn test_blank_text_queues_nothing() {
    let connection = Connection::new();
    connection.results().enqueue_chunked_text("   \n\t ");
    assert!(connection.results().is_empty());
}

#[test_log::test]
fn test_json_round_trip() -> MockDbResult<()> {
    let entities: Vec<common::TestEntity> = (1..=300).map(common::TestEntity::new).collect();
    let connection = Connection::new();
    connection.results().enqueue_json(&entities)?;

    let mut reader = connection.create_command().execute_reader()?;
    assert!(reader.has_rows());
    let decoded: Vec<common::TestEntity> = reader.read_json()?;
    assert_eq!(decoded, entities);
    Ok(())
}

#[test_log::test]
fn test_fault_raised_at_execution() {
    let connection = Connection::new();
    let connection_id = uuid::Uuid::new_v4();
    connection.results().enqueue_fault(
        FaultDescriptor::builder()
            .message("Test Message")
            .errors(vec![
                SqlErrorRecord::builder()
                    .number(1205)
                    .severity(13)
                    .message("deadlock")
                    .build(),
            ])
            .cause(anyhow::anyhow!("inner"))
            .connection_id(connection_id)
            .build(),
    );

    let err = connection.create_command().execute_reader().unwrap_err();
    let fault = match err {
        MockDbError::Sql(fault) => fault,
        other => panic!("expected a queued fault, got {other:?}"),
    };
    assert_eq!(fault.message(), "Test Message");
    assert_eq!(fault.errors()[0].number, 1205);
    assert_eq!(fault.connection_id(), connection_id);
    assert_eq!(fault.source().map(|e| e.to_string()), Some("inner".to_string()));
}

#[test_log::test]
fn test_fault_in_chain_surfaces_on_next_result() -> MockDbResult<()> {
    let db = MockDatabase::new();
    db.results().enqueue_scalar("first");
    db.results().enqueue_fault(FaultDescriptor::builder().message("second failed").build());
    db.results().enqueue_scalar("third");

    let connection = db.connection();
    let mut reader = connection.create_command().execute_reader()?;
    assert!(reader.read());
    assert_eq!(reader.get_string(0)?, "first");

    assert_matches!(
        reader.next_result(),
        Err(MockDbError::Sql(f)) if f.message() == "second failed"
    );
    assert!(reader.is_closed());

    let third = connection.create_command().execute_scalar()?;
    assert_eq!(third, Some(Value::from("third")));
    Ok(())
}

#[test_log::test]
fn test_shared_database_queue_is_drained_once() -> MockDbResult<()> {
    let db = MockDatabase::new();
    db.results().enqueue_row_count(1);
    db.results().enqueue_row_count(2);

    let first = db.connection();
    let second = db.connection();
    assert_eq!(second.create_command().execute_non_query()?, 1);
    assert_eq!(first.create_command().execute_non_query()?, 2);
    assert_eq!(first.create_command().execute_non_query()?, 0);

    let log = db.executed_commands();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].connection_id, second.id());
    assert_eq!(log[1].connection_id, first.id());
    Ok(())
}

#[test_log::test]
fn test_typed_getters_check_kinds() -> MockDbResult<()> {
    let id = uuid::Uuid::new_v4();
    let now = chrono::Utc::now();
    let table = Table::build(
        [()],
        vec![
            Column::new("Id", ValueKind::Guid),
            Column::new("At", ValueKind::DateTime),
            Column::new("Blob", ValueKind::Bytes),
            Column::new("Flag", ValueKind::Bool),
            Column::new("Missing", ValueKind::String),
        ],
        |_| {
            Some(vec![
                Value::from(id),
                Value::from(now),
                Value::from(vec![1u8, 2, 3]),
                Value::from(true),
                Value::Null,
            ])
        },
    )?;

    let connection = Connection::new();
    connection.results().enqueue_table(Some(table));
    let mut reader = connection.create_command().execute_reader()?;
    assert!(reader.read());

    assert_eq!(reader.get_guid(0)?, id);
    assert_eq!(reader.get_datetime(1)?, now);
    assert_eq!(reader.get_bytes(2)?, &[1, 2, 3]);
    assert!(reader.get_bool(3)?);
    assert!(reader.is_null(4)?);
    assert_matches!(reader.get_string(4), Err(MockDbError::InvalidCast { .. }));
    assert_matches!(reader.get_i64(0), Err(MockDbError::InvalidCast { .. }));
    assert_matches!(reader.get_value_by_name("nope"), Err(MockDbError::NotFound(_)));
    Ok(())
}

proptest! {
    #[test]
    fn test_tables_surface_in_fifo_order(count in 1usize..12) {
        let connection = Connection::new();
        for value in 0..count as i32 {
            connection.results().enqueue_scalar(value);
        }

        let mut reader = connection.create_command().execute_reader()?;
        for value in 0..count as i32 {
            if value > 0 {
                prop_assert!(reader.next_result()?);
            }
            prop_assert!(reader.read());
            prop_assert_eq!(reader.get_i32(0)?, value);
            prop_assert!(!reader.read());
        }

        prop_assert!(!reader.next_result()?);
        prop_assert!(connection.results().is_empty());
    }

    #[test]
    fn test_fault_fires_at_its_position(
        (count, fault_at) in (1usize..10).prop_flat_map(|n| (Just(n), 0..n))
    ) {
        let connection = Connection::new();
        for position in 0..count {
            if position == fault_at {
                connection.results().enqueue_fault(
                    FaultDescriptor::builder().message(format!("fault {position}")).build(),
                );
            } else {
                connection.results().enqueue_scalar(position as i32);
            }
        }
        let expected = format!("fault {fault_at}");
        let command = connection.create_command();

        if fault_at == 0 {
            let raised = command.execute_reader();
            prop_assert!(
                matches!(&raised, Err(MockDbError::Sql(f)) if f.message() == expected),
                "expected the queued fault, got {:?}",
                raised
            );
        } else {
            let mut reader = command.execute_reader()?;
            for position in 0..fault_at {
                if position > 0 {
                    prop_assert!(reader.next_result()?);
                }
                prop_assert!(reader.read());
                prop_assert_eq!(reader.get_i32(0)?, position as i32);
            }

            let raised = reader.next_result();
            prop_assert!(
                matches!(&raised, Err(MockDbError::Sql(f)) if f.message() == expected),
                "expected the queued fault, got {:?}",
                raised
            );
            prop_assert!(reader.is_closed());
        }

        prop_assert_eq!(connection.results().len(), count - fault_at - 1);
    }
}
