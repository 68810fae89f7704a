use oradb_operator::diff::{mask_unchanged, Diff};

#[derive(Diff, Debug, Default, PartialEq, Eq)]
struct StorageSettings {
    size_in_gbs: Option<u32>,
    auto_scaling: Option<bool>,
}

#[derive(Diff, Debug, Default, PartialEq, Eq)]
struct DatabaseSpec {
    display_name: Option<String>,
    storage: StorageSettings,
}

#[test]
fn derives_field_by_field_masking() {
    let last_applied = DatabaseSpec {
        display_name: Some("db1".to_string()),
        storage: StorageSettings {
            size_in_gbs: Some(256),
            auto_scaling: Some(false),
        },
    };
    let candidate = DatabaseSpec {
        display_name: Some("db1".to_string()),
        storage: StorageSettings {
            size_in_gbs: Some(512),
            auto_scaling: Some(false),
        },
    };

    let (masked, changed) = mask_unchanged(candidate, &last_applied);

    assert!(changed);
    assert_eq!(
        masked,
        DatabaseSpec {
            display_name: None,
            storage: StorageSettings {
                size_in_gbs: Some(512),
                auto_scaling: None,
            },
        }
    );
}

#[test]
fn derives_for_tuple_structs() {
    #[derive(Diff, Debug, PartialEq, Eq)]
    struct Endpoints(Option<String>, Option<u16>);

    let (masked, changed) = mask_unchanged(
        Endpoints(Some("db.example.com".to_string()), Some(1522)),
        &Endpoints(Some("db.example.com".to_string()), Some(1521)),
    );

    assert!(changed);
    assert_eq!(masked, Endpoints(None, Some(1522)));
}

#[test]
fn derives_for_generic_structs() {
    #[derive(Diff, Debug, PartialEq, Eq)]
    #[diff(bound = "T: Diff")]
    struct Tagged<T> {
        inner: T,
        label: Option<String>,
    }

    let (masked, changed) = mask_unchanged(
        Tagged {
            inner: Some(4_u32),
            label: Some("prod".to_string()),
        },
        &Tagged {
            inner: Some(2_u32),
            label: Some("prod".to_string()),
        },
    );

    assert!(changed);
    assert_eq!(
        masked,
        Tagged {
            inner: Some(4_u32),
            label: None,
        }
    );
}
