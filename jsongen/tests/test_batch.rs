use std::collections::BTreeMap;

use jsongen::{from_json, json_types, to_string, ErrorKind, JsonStr};

json_types! {
    #[derive(Debug, PartialEq)]
    pub struct Department {
        name: String,
        head: Option<Box<Employee>>,
    }

    #[derive(Debug, PartialEq)]
    #[json(rename_all = "camelCase")]
    pub struct Employee {
        full_name: String,
        department: Option<Department>,
        reports: Vec<Employee>,
        level: Level,
    }

    #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
    #[json(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum Level {
        Junior,
        SeniorStaff,
    }

    #[derive(Debug, PartialEq)]
    pub struct Headcount {
        by_level: BTreeMap<Level, u32>,
        #[json(rename = "lead")]
        lead_level: Box<Level>,
    }
}

#[test]
fn test_mutual_recursion_roundtrip() {
    let dept = Department {
        name: "R&D".into(),
        head: Some(Box::new(Employee {
            full_name: "Grace".into(),
            department: Some(Department {
                name: "Compilers".into(),
                head: None,
            }),
            reports: vec![Employee {
                full_name: "Alan".into(),
                department: None,
                reports: vec![],
                level: Level::Junior,
            }],
            level: Level::SeniorStaff,
        })),
    };

    let json = to_string(&dept);
    assert_eq!(
        json,
        concat!(
            r#"{"name":"R&D","head":{"fullName":"Grace","#,
            r#""department":{"name":"Compilers","head":null},"#,
            r#""reports":[{"fullName":"Alan","department":null,"reports":[],"level":"JUNIOR"}],"#,
            r#""level":"SENIOR_STAFF"}}"#
        )
    );
    assert_eq!(from_json::<Department>(&json).unwrap(), dept);
}

#[test]
fn test_enum_names() {
    assert_eq!(Level::VARIANTS, &["JUNIOR", "SENIOR_STAFF"]);
    assert_eq!(Level::SeniorStaff.as_json_str(), "SENIOR_STAFF");
    assert_eq!(Level::from_json_str("JUNIOR"), Some(Level::Junior));
    assert_eq!(Level::from_json_str("Junior"), None);
    assert_eq!(to_string(&Level::Junior), r#""JUNIOR""#);
    assert_eq!(from_json::<Level>(r#""SENIOR_STAFF""#).unwrap(), Level::SeniorStaff);
}

#[test]
fn test_enum_map_keys() {
    let mut by_level = BTreeMap::new();
    by_level.insert(Level::SeniorStaff, 2);
    by_level.insert(Level::Junior, 5);
    let headcount = Headcount {
        by_level,
        lead_level: Box::new(Level::SeniorStaff),
    };

    let json = to_string(&headcount);
    assert_eq!(
        json,
        r#"{"by_level":{"JUNIOR":5,"SENIOR_STAFF":2},"lead":"SENIOR_STAFF"}"#
    );
    assert_eq!(from_json::<Headcount>(&json).unwrap(), headcount);

    let err = from_json::<Headcount>(r#"{"by_level":{"MANAGER":1},"lead":"JUNIOR"}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownVariant);
    assert_eq!(err.field(), Some("by_level"));
}

#[test]
fn test_missing_field_in_recursive_value() {
    let err = from_json::<Department>(r#"{"name":"x","head":{"fullName":"y","reports":[]}}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
    assert_eq!(err.field(), Some("level"));
}
