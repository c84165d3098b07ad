//! Black-box integration tests exercising the full adapter → tokenizer →
//! builder pipeline through the public `ParserCore`/`JsonStream` surface.

use futures::{stream, StreamExt};
use jsonriver::{ParseError, ParserConfig, ParserCore, Value};
use pretty_assertions::assert_eq;

fn feed_chunks(chunks: &[&str]) -> Result<(Vec<Value>, Option<Value>), ParseError> {
    let mut core = ParserCore::with_defaults();
    let mut yields = Vec::new();
    for chunk in chunks {
        yields.extend(core.feed(chunk.as_bytes())?);
    }
    let last = core.finish()?;
    Ok((yields, last))
}

fn parse_all(text: &str) -> Value {
    let mut core = ParserCore::with_defaults();
    let mut yields = core.feed(text.as_bytes()).unwrap();
    if let Some(last) = core.finish().unwrap() {
        yields.push(last);
    }
    yields.into_iter().last().expect("at least one yield")
}

// Scenario 1: `"[1]"` with chunks `"["`, `"1"`, `"]"`.
#[test]
fn test_scenario_array_of_one_by_bracket_chunks() {
    let (yields, last) = feed_chunks(&["[", "1", "]"]).unwrap();
    assert_eq!(yields[0], Value::Array(vec![]));
    assert_eq!(*yields.last().unwrap(), Value::Array(vec![Value::Number(1.0)]));
    assert_eq!(last, Some(Value::Array(vec![Value::Number(1.0)])));
}

// Scenario 2: `"[1,2,3]"` with chunk size 1.
#[test]
fn test_scenario_array_of_three_byte_at_a_time() {
    let text = "[1,2,3]";
    let chunks: Vec<String> = text.chars().map(|c| c.to_string()).collect();
    let refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
    let (yields, last) = feed_chunks(&refs).unwrap();

    assert!(yields.contains(&Value::Array(vec![])));
    assert!(yields.contains(&Value::Array(vec![Value::Number(1.0)])));
    assert!(yields.contains(&Value::Array(vec![Value::Number(1.0), Value::Number(2.0)])));
    assert_eq!(
        last,
        Some(Value::Array(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0)
        ]))
    );
}

// Scenario 3: `'{"a":"hello"}'` split mid-string.
#[test]
fn test_scenario_object_string_value_split_mid_string() {
    let (yields, last) = feed_chunks(&[r#"{"a":"he"#, r#"llo"}"#]).unwrap();
    let partial = Value::Object(vec![("a".to_string(), Value::String("he".to_string()))]);
    let complete = Value::Object(vec![("a".to_string(), Value::String("hello".to_string()))]);
    assert!(yields.contains(&partial));
    assert_eq!(last, Some(complete));
}

// Scenario 4: `"null"` fed one character at a time.
#[test]
fn test_scenario_null_chunk_by_chunk() {
    let (yields, last) = feed_chunks(&["n", "u", "l", "l"]).unwrap();
    assert_eq!(yields, vec![Value::Null]);
    assert_eq!(last, Some(Value::Null));
}

// Scenario 5: a surrogate pair split between the two `\u` escapes.
#[test]
fn test_scenario_surrogate_pair_split_across_chunks() {
    let (_, last) = feed_chunks(&[r#""\uD83D"#, r#"\uDE00""#]).unwrap();
    assert_eq!(last, Some(Value::String("\u{1F600}".to_string())));
}

// Scenario 6: malformed `"[1,]"`, fed character by character so each
// completed prior yield is observed before the error on `]`.
#[test]
fn test_scenario_trailing_comma_errors_after_prior_yields() {
    let mut core = ParserCore::with_defaults();
    let mut yields = Vec::new();
    for c in "[1,".chars() {
        yields.extend(core.feed(c.to_string().as_bytes()).unwrap());
    }
    assert_eq!(*yields.last().unwrap(), Value::Array(vec![Value::Number(1.0)]));

    let err = core.feed(b"]").unwrap_err();
    assert!(matches!(err, ParseError::Structural(_)));
}

#[test]
fn test_chunk_independence_over_a_small_corpus() {
    let corpus = [
        r#"{"a":1,"b":[true,false,null],"c":{"d":"e"}}"#,
        r#"[1,2,3,4,5,6,7,8,9,10]"#,
        r#""a plain string with spaces""#,
        r#"{"nested":{"deeper":{"deepest":[1,2,[3,4]]}}}"#,
        r#"-12.5e10"#,
    ];

    for text in corpus {
        let whole = parse_all(text);

        let mut core = ParserCore::with_defaults();
        let mut byte_at_a_time_yields = Vec::new();
        for byte in text.as_bytes() {
            byte_at_a_time_yields.extend(core.feed(&[*byte]).unwrap());
        }
        if let Some(last) = core.finish().unwrap() {
            byte_at_a_time_yields.push(last);
        }
        let byte_at_a_time = byte_at_a_time_yields.into_iter().last().unwrap();

        assert_eq!(whole, byte_at_a_time, "mismatch for input: {text}");
    }
}

#[test]
fn test_deep_nesting_to_one_thousand_levels_succeeds() {
    let depth = 1000;
    let mut text = String::new();
    text.push_str(&"[".repeat(depth));
    text.push('1');
    text.push_str(&"]".repeat(depth));

    let config = ParserConfig::builder().max_depth(depth + 1).build();
    let mut core = ParserCore::new(&config);
    let mut yields = core.feed(text.as_bytes()).unwrap();
    if let Some(last) = core.finish().unwrap() {
        yields.push(last);
    }

    let mut expected = Value::Number(1.0);
    for _ in 0..depth {
        expected = Value::Array(vec![expected]);
    }
    assert_eq!(*yields.last().unwrap(), expected);
}

#[test]
fn test_depth_exceeded_reports_structural_error() {
    let text = format!("{}1{}", "[".repeat(10), "]".repeat(10));
    let config = ParserConfig::builder().max_depth(5).build();
    let mut core = ParserCore::new(&config);
    let err = core.feed(text.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        ParseError::Structural(jsonriver::StructuralError::DepthExceeded { max_depth: 5 })
    ));
}

#[tokio::test]
async fn test_json_stream_end_to_end_over_an_async_byte_stream() {
    let text = r#"{"values":[1,2,3],"done":true}"#;
    let chunks: Vec<Result<&[u8], ParseError>> = text
        .as_bytes()
        .chunks(3)
        .map(|chunk| Ok(chunk))
        .collect();

    let mut jstream = jsonriver::JsonStream::new(stream::iter(chunks));
    let mut last = None;
    while let Some(result) = jstream.next().await {
        last = Some(result.unwrap());
    }

    assert_eq!(
        last,
        Some(Value::Object(vec![
            (
                "values".to_string(),
                Value::Array(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)])
            ),
            ("done".to_string(), Value::Bool(true)),
        ]))
    );
}

#[test]
fn test_unexpected_eof_inside_unclosed_array() {
    let mut core = ParserCore::with_defaults();
    core.feed(b"[1,2").unwrap();
    let err = core.finish().unwrap_err();
    assert!(matches!(
        err,
        ParseError::UnexpectedEof(jsonriver::UnexpectedEofError::UnclosedContainer { .. })
    ));
}
