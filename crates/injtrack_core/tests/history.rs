use chrono::NaiveDate;
use injtrack_core::{
    aggregate_history, HistoryEntry, Injection, InjectionSite, Measurement, RecordKind,
    SideEffect, WeightEntry,
};

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn injection(id: &str, date: NaiveDate) -> Injection {
    Injection {
        id: id.to_string(),
        date,
        dose: 0.25,
        site: InjectionSite::ArmLeft,
        comment: None,
    }
}

fn weight(id: &str, date: NaiveDate) -> WeightEntry {
    WeightEntry {
        id: id.to_string(),
        date,
        weight: 88.0,
    }
}

#[test]
fn newest_entry_comes_first() {
    let injections = vec![injection("i1", day(2024, 1, 1))];
    let weights = vec![weight("w1", day(2024, 1, 2))];

    let history = aggregate_history(&injections, &weights, &[], &[]);

    assert_eq!(history.len(), 2);
    assert_eq!(history[0], HistoryEntry::Weight(&weights[0]));
    assert_eq!(history[1], HistoryEntry::Injection(&injections[0]));
}

#[test]
fn entries_are_tagged_with_their_collection() {
    let injections = vec![injection("shared", day(2024, 5, 1))];
    let weights = vec![weight("shared", day(2024, 5, 2))];
    let side_effects = vec![SideEffect {
        id: "s1".to_string(),
        date: day(2024, 5, 3),
        description: "fatigue".to_string(),
    }];
    let measurements = vec![Measurement {
        id: "m1".to_string(),
        date: day(2024, 5, 4),
        neck: Some(39.0),
        waist: None,
        hips: None,
        shoulders: None,
    }];

    let history = aggregate_history(&injections, &weights, &side_effects, &measurements);
    let tags: Vec<(RecordKind, &str)> = history
        .iter()
        .map(|entry| (entry.kind(), entry.id()))
        .collect();

    assert_eq!(
        tags,
        vec![
            (RecordKind::Measurement, "m1"),
            (RecordKind::SideEffect, "s1"),
            (RecordKind::Weight, "shared"),
            (RecordKind::Injection, "shared"),
        ]
    );
}

#[test]
fn history_is_sorted_descending_across_many_dates() {
    let injections = vec![
        injection("a", day(2024, 1, 10)),
        injection("b", day(2023, 12, 31)),
        injection("c", day(2024, 2, 1)),
    ];
    let weights = vec![weight("d", day(2024, 1, 15))];

    let history = aggregate_history(&injections, &weights, &[], &[]);
    let dates: Vec<NaiveDate> = history.iter().map(HistoryEntry::date).collect();

    let mut expected = dates.clone();
    expected.sort_by(|left, right| right.cmp(left));
    assert_eq!(dates, expected);
    assert_eq!(history[0].id(), "c");
}

#[test]
fn empty_collections_give_empty_history() {
    assert!(aggregate_history(&[], &[], &[], &[]).is_empty());
}
