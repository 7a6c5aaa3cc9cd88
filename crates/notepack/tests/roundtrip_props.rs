use notepack::{decode, encode, Extension, MsgPackDecoder, MsgPackError, Timestamp, Value};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        any::<u64>().prop_map(Value::from),
        any::<f64>().prop_map(Value::Float),
        ".{0,40}".prop_map(Value::Str),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Bytes),
        (any::<i64>(), 0u32..1_000_000_000)
            .prop_map(|(s, ns)| Value::Timestamp(Timestamp::new(s, ns))),
        (any::<i8>(), prop::collection::vec(any::<u8>(), 0..40))
            .prop_filter("timestamp layout", |(kind, data)| {
                *kind != -1 || !matches!(data.len(), 4 | 8 | 12)
            })
            .prop_map(|(kind, data)| Value::Extension(Extension::new(kind, data))),
    ]
}

fn value_tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::vec((inner.clone(), inner), 0..8).prop_map(Value::Map),
        ]
    })
}

proptest! {
    #[test]
    fn prop_roundtrip(value in value_tree()) {
        let encoded = encode(&value).unwrap();
        let decoded = decode(&encoded).unwrap();
        prop_assert_eq!(&decoded, &value);
    }

    #[test]
    fn prop_reencode_is_stable(value in value_tree()) {
        let encoded = encode(&value).unwrap();
        let reencoded = encode(&decode(&encoded).unwrap()).unwrap();
        prop_assert_eq!(reencoded, encoded);
    }

    #[test]
    fn prop_consumes_exactly_one_value(value in value_tree(), tail in prop::collection::vec(any::<u8>(), 0..16)) {
        let mut bytes = encode(&value).unwrap();
        let len = bytes.len();
        bytes.extend_from_slice(&tail);
        let (decoded, consumed) = MsgPackDecoder::new().decode_with_consumed(&bytes).unwrap();
        prop_assert_eq!(consumed, len);
        prop_assert_eq!(decoded, value);
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&bytes);
    }

    #[test]
    fn prop_truncation_is_an_error(value in value_tree()) {
        let encoded = encode(&value).unwrap();
        for cut in 0..encoded.len() {
            prop_assert!(decode(&encoded[..cut]).is_err());
        }
    }

    #[test]
    fn prop_extensions_never_change_variant(
        kind in any::<i8>(),
        data in prop::collection::vec(any::<u8>(), 0..20),
    ) {
        let value = Value::Extension(Extension::new(kind, data.clone()));
        match encode(&value) {
            Ok(encoded) => {
                prop_assert_eq!(decode(&encoded).unwrap(), value);
            }
            Err(err) => {
                prop_assert!(kind == -1 && matches!(data.len(), 4 | 8 | 12));
                prop_assert!(matches!(err, MsgPackError::UnsupportedValue(_)));
            }
        }
    }
}
