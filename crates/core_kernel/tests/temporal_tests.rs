//! Calendar month behavior across longer ranges

use chrono::{Duration, TimeZone, Utc};
use core_kernel::{SettlementMonth, Timezone};
use proptest::prelude::*;

#[test]
fn walking_a_year_of_months_visits_each_once() {
    let mut cursor = SettlementMonth::new(2023, 11).unwrap();
    let end = SettlementMonth::new(2024, 10).unwrap();

    let mut visited = Vec::new();
    while cursor <= end {
        visited.push(cursor.to_string());
        cursor = cursor.succ();
    }

    assert_eq!(visited.len(), 12);
    assert_eq!(visited.first().map(String::as_str), Some("2023-11"));
    assert_eq!(visited.last().map(String::as_str), Some("2024-10"));
}

#[test]
fn instants_inside_a_month_bucket_to_it() {
    let tz: Timezone = "Asia/Singapore".parse().unwrap();
    let month = SettlementMonth::new(2024, 2).unwrap();

    let start = month.first_instant(&tz);
    let just_before_next = month.succ().first_instant(&tz) - Duration::seconds(1);

    assert_eq!(SettlementMonth::of_instant(start, &tz), month);
    assert_eq!(SettlementMonth::of_instant(just_before_next, &tz), month);
}

proptest! {
    #[test]
    fn succ_and_pred_are_inverses(year in 1990i32..2100, month in 1u32..=12) {
        let m = SettlementMonth::new(year, month).unwrap();
        prop_assert_eq!(m.succ().pred(), m);
        prop_assert_eq!(m.pred().succ(), m);
    }

    #[test]
    fn display_and_parse_round_trip(year in 1990i32..2100, month in 1u32..=12) {
        let m = SettlementMonth::new(year, month).unwrap();
        let parsed: SettlementMonth = m.to_string().parse().unwrap();
        prop_assert_eq!(parsed, m);
        let tagged: SettlementMonth = m.as_tag().parse().unwrap();
        prop_assert_eq!(tagged, m);
    }

    #[test]
    fn utc_bucketing_matches_timestamp_fields(days in 0i64..20000) {
        let instant = Utc.with_ymd_and_hms(1990, 1, 1, 12, 0, 0).unwrap() + Duration::days(days);
        let month = SettlementMonth::of_instant(instant, &Timezone::default());
        prop_assert_eq!(month.year(), chrono::Datelike::year(&instant));
        prop_assert_eq!(month.month(), chrono::Datelike::month(&instant));
    }
}
