#![allow(missing_docs)]

use proptest::prelude::*;
use rowcode::{Rowcode, RowcodeOptions, RowcodeRecord, Timestamp, Uuid};

#[derive(RowcodeRecord, Clone, Debug, PartialEq)]
struct Sample {
    #[rowcode(column = 7)]
    note: String,
    #[rowcode(column = 2)]
    flag: bool,
    #[rowcode(column = 3)]
    small: i32,
    #[rowcode(column = 4)]
    large: i64,
    #[rowcode(column = 5)]
    ratio: f64,
    #[rowcode(column = 1)]
    id: Uuid,
    #[rowcode(column = 6)]
    at: Timestamp,
}

fn sample() -> impl Strategy<Value = Sample> {
    (
        "[a-zA-Z0-9 _.-]{0,12}",
        any::<bool>(),
        any::<i32>(),
        any::<i64>(),
        any::<f64>().prop_filter("NaN never compares equal", |v| !v.is_nan()),
        any::<u128>(),
        0..=rowcode::timestamp::MAX_TICKS,
    )
        .prop_map(|(note, flag, small, large, ratio, id, ticks)| Sample {
            note,
            flag,
            small,
            large,
            ratio,
            id: Uuid::from_u128(id),
            at: Timestamp::from_ticks(ticks).expect("strategy stays in range"),
        })
}

fn delimiter() -> impl Strategy<Value = char> {
    prop::sample::select(vec![',', ';', '\t', '|', '¦'])
}

#[derive(RowcodeRecord, Clone, Debug, PartialEq)]
struct Note {
    #[rowcode(column = 1)]
    text: String,
}

fn notes() -> impl Strategy<Value = Vec<Note>> {
    prop::collection::vec("[a-z]{0,3}", 0..30)
        // A single empty line encodes to the empty buffer, which holds no rows.
        .prop_filter("lone empty line", |texts| texts.as_slice() != [String::new()])
        .prop_map(|texts| texts.into_iter().map(|text| Note { text }).collect())
}

proptest! {
    #[test]
    fn text_round_trip(rows in prop::collection::vec(sample(), 0..40), delim in delimiter(), header in any::<bool>()) {
        let options = RowcodeOptions::default()
            .with_delimiter(delim)
            .with_header(header)
            .with_header_output(header);
        let text = Rowcode::serialize_with(&rows, &options).expect("encodable");
        let decoded: Vec<Sample> = Rowcode::deserialize_with(&text, &options).expect("decodable");
        prop_assert_eq!(decoded, rows);
    }

    #[test]
    fn byte_round_trip(rows in prop::collection::vec(sample(), 0..40), delim in delimiter()) {
        let options = RowcodeOptions::default().with_delimiter(delim);
        let bytes = Rowcode::serialize_to_bytes(&rows, &options).expect("encodable");
        let decoded: Vec<Sample> = Rowcode::deserialize_bytes(&bytes, &options).expect("decodable");
        prop_assert_eq!(decoded, rows);
    }

    #[test]
    fn rows_never_end_with_the_delimiter(row in sample(), delim in delimiter()) {
        let options = RowcodeOptions::default().with_delimiter(delim);
        let line = Rowcode::serialize_row(&row, &options).expect("encodable");
        prop_assert!(!line.ends_with(delim) || row.note.is_empty());
        prop_assert_eq!(line.matches(delim).count(), 6);
    }

    #[test]
    fn single_string_column_round_trip(rows in notes()) {
        let options = RowcodeOptions::default();
        let text = Rowcode::serialize(&rows).expect("encodable");
        let from_text: Vec<Note> = Rowcode::deserialize(&text).expect("decodable");
        let from_bytes: Vec<Note> =
            Rowcode::deserialize_bytes(text.as_bytes(), &options).expect("decodable");
        prop_assert_eq!(&from_text, &rows);
        prop_assert_eq!(from_bytes, rows);
    }
}
