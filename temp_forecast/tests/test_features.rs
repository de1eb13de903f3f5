use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use temp_forecast::features::{
    build_features, positional_features, FeatureRow, FutureFeatureScheme,
};

#[rstest]
#[case(2024, 1, 1, 0, FeatureRow { hour: 0, weekday: 0, month: 1 })]
#[case(2024, 3, 10, 13, FeatureRow { hour: 13, weekday: 6, month: 3 })]
#[case(2023, 12, 29, 23, FeatureRow { hour: 23, weekday: 4, month: 12 })]
fn test_calendar_features(
    #[case] year: i32,
    #[case] month: u32,
    #[case] day: u32,
    #[case] hour: u32,
    #[case] expected: FeatureRow,
) {
    let ts = Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap();
    assert_eq!(FeatureRow::from_timestamp(ts), expected);
}

#[test]
fn test_ranges_hold_over_a_year() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let timestamps: Vec<_> = (0..24 * 366).map(|h| start + Duration::hours(h)).collect();
    let rows = build_features(&timestamps);

    assert_eq!(rows.len(), timestamps.len());
    for row in &rows {
        assert!(row.hour <= 23);
        assert!(row.weekday <= 6);
        assert!((1..=12).contains(&row.month));
    }
}

#[test]
fn test_pure_and_order_preserving() {
    let a = Utc.with_ymd_and_hms(2024, 6, 1, 5, 0, 0).unwrap();
    let b = Utc.with_ymd_and_hms(2024, 2, 3, 17, 0, 0).unwrap();
    let forward = build_features(&[a, b]);
    let backward = build_features(&[b, a]);

    assert_eq!(forward[0], backward[1]);
    assert_eq!(forward[1], backward[0]);
    assert_eq!(build_features(&[a, b]), forward);
}

#[test]
fn test_vector_order() {
    let row = FeatureRow {
        hour: 7,
        weekday: 2,
        month: 9,
    };
    assert_eq!(row.to_vec(), [7.0, 2.0, 9.0]);
    assert_eq!(FeatureRow::feature_names(), ["Hour", "Day", "Month"]);
}

#[test]
fn test_positional_formula() {
    let rows = positional_features(48, 24 * 3);
    for (offset, row) in rows.iter().enumerate() {
        let i = 48 + offset;
        assert_eq!(row.hour, (i % 24) as u32);
        assert_eq!(row.weekday, ((i / 24) % 7) as u32);
        assert_eq!(row.month, ((i / 24) % 12 + 1) as u32);
    }
    assert_eq!(rows[0], FeatureRow { hour: 0, weekday: 2, month: 3 });
}

#[test]
fn test_calendar_default_differs_from_positional() {
    assert_eq!(FutureFeatureScheme::default(), FutureFeatureScheme::Calendar);

    // third day of January 2024, row index 48 of an hourly series
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let calendar = build_features(&[start + Duration::hours(48)]);
    let positional = positional_features(48, 1);

    assert_eq!(calendar[0].hour, positional[0].hour);
    assert_eq!(calendar[0].month, 1);
    assert_eq!(positional[0].month, 3);
}
