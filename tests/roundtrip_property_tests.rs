use proptest::prelude::*;
use std::collections::BTreeMap;
use xlfedit::{EditorState, JsonShape, TranslationUnit, UpdateOutcome, formats::generate_export};

fn segment_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,8}").expect("valid segment regex")
}

fn flat_key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_.]{0,15}").expect("valid key regex")
}

fn value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _\\-\\.,!\\?&<>\"']{0,30}")
        .expect("valid value regex")
}

/// Two-segment ids never collide with a prefix of another id.
fn nested_dataset_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(
        (segment_strategy(), segment_strategy()),
        value_strategy(),
        1..8,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|((group, leaf), value)| (format!("{}.{}", group, leaf), value))
            .collect()
    })
}

fn flat_dataset_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(flat_key_strategy(), value_strategy(), 1..8)
}

fn build_units(values: &BTreeMap<String, String>) -> Vec<TranslationUnit> {
    values
        .iter()
        .map(|(id, target)| TranslationUnit::new(id.clone(), "", target.clone()))
        .collect()
}

fn canonical_map(state: &EditorState) -> BTreeMap<String, String> {
    state
        .units()
        .iter()
        .map(|u| (u.id.clone(), u.target.clone()))
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn xliff_document(values: &BTreeMap<String, String>) -> String {
    let mut units = String::new();
    for (i, (id, target)) in values.iter().enumerate() {
        units.push_str(&format!(
            "      <trans-unit id=\"{}\">\n        <source>Source {}</source>\n        <target>{}</target>\n      </trans-unit>\n",
            id,
            i,
            escape(target)
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xliff version=\"1.2\" xmlns=\"urn:oasis:names:tc:xliff:document:1.2\">\n  <file source-language=\"en\" target-language=\"de\">\n    <body>\n{}    </body>\n  </file>\n</xliff>\n",
        units
    )
}

fn json_roundtrip(
    values: &BTreeMap<String, String>,
    shape: JsonShape,
) -> Result<EditorState, TestCaseError> {
    let json = generate_export(&build_units(values), shape, Some("de"))
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    let mut state = EditorState::new();
    state
        .load(Some("seed.json"), &json)
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    Ok(state)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn flat_json_roundtrip_preserves_entries(values in flat_dataset_strategy()) {
        let state = json_roundtrip(&values, JsonShape::Flat)?;
        prop_assert_eq!(canonical_map(&state), values);
    }

    #[test]
    fn nested_json_roundtrip_preserves_entries(values in nested_dataset_strategy()) {
        let state = json_roundtrip(&values, JsonShape::Nested)?;
        prop_assert_eq!(state.document_format(), Some("json (nested)"));
        prop_assert_eq!(canonical_map(&state), values);
    }

    #[test]
    fn wrapped_json_roundtrip_preserves_entries(values in flat_dataset_strategy()) {
        let state = json_roundtrip(&values, JsonShape::Wrapped)?;
        prop_assert_eq!(state.document_format(), Some("json (wrapped)"));
        prop_assert_eq!(state.target_lang(), Some("de"));
        prop_assert_eq!(canonical_map(&state), values);
    }

    #[test]
    fn xliff_edit_touches_only_the_edited_unit(
        values in flat_dataset_strategy(),
        pick in any::<prop::sample::Index>(),
        replacement in value_strategy(),
    ) {
        let document = xliff_document(&values);
        let mut state = EditorState::new();
        state
            .load(Some("seed.xlf"), &document)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(canonical_map(&state), values.clone());

        let keys: Vec<&String> = values.keys().collect();
        let id = keys[pick.index(keys.len())].clone();
        let outcome = state
            .update_unit(&id, &replacement)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(outcome, UpdateOutcome::Applied);

        let written = state
            .serialize()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut reloaded = EditorState::new();
        reloaded
            .load(Some("seed.xlf"), &written)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let mut expected = values.clone();
        expected.insert(id, replacement);
        prop_assert_eq!(canonical_map(&reloaded), expected);
        prop_assert_eq!(reloaded.units().len(), values.len());
    }
}
