use heads_up::schedule::{classify, sort_by_schedule, Weekday, NO_TIME_SORT_VALUE, UNKNOWN_ORDINAL};

// Test weekday extraction from short codes and full names
fn test_weekday_codes() {
    println!("\n====== Testing weekday extraction ======");
    let cases = [
        ("Ballet 1 M", 0),
        ("Tap 2 TU", 1),
        ("Jazz 3 W", 2),
        ("Hip Hop TH", 3),
        ("Company F", 4),
        ("Rehearsal SA", 5),
        ("Open SU", 6),
        ("Jazz 3 Wednesday", 2),
        ("Recital", UNKNOWN_ORDINAL),
        ("", UNKNOWN_ORDINAL),
    ];

    for (label, expected) in cases {
        let weekday = classify(label).weekday;
        assert_eq!(weekday.ordinal(), expected, "label {:?}", label);
        println!("✓ {:?} classified as {}", label, weekday);
    }
}

// Test time-of-day extraction and 12-hour conversion
fn test_times() {
    println!("\n====== Testing time extraction ======");
    let cases = [
        ("Ballet 10:45A M", Some(645)),
        ("Tap 2:15P TU", Some(855)),
        ("Rehearsal 12:00A SA", Some(0)),
        ("Company 12:30P F", Some(750)),
        ("Ballet 1 M", None),
    ];

    for (label, expected) in cases {
        let class = classify(label);
        assert_eq!(class.time.map(|t| t.minutes()), expected, "label {:?}", label);
        if expected.is_none() {
            assert_eq!(class.sort_minutes(), NO_TIME_SORT_VALUE);
        }
        println!("✓ {:?} has time {:?}", label, expected);
    }
}

// Test schedule ordering and stability
fn test_sorting() {
    println!("\n====== Testing schedule ordering ======");
    let mut labels = vec!["Tap 2 TU", "Ballet 1 M", "Jazz 3 W", "Recital"];
    sort_by_schedule(&mut labels, |l| *l);
    assert_eq!(labels, ["Ballet 1 M", "Tap 2 TU", "Jazz 3 W", "Recital"]);
    println!("✓ Labels ordered as {:?}", labels);

    let mut rows = vec![("Tap 2 TU", 'a'), ("Tap 2 TU", 'b'), ("Ballet 1 M", 'c')];
    sort_by_schedule(&mut rows, |row| row.0);
    assert_eq!(rows, [("Ballet 1 M", 'c'), ("Tap 2 TU", 'a'), ("Tap 2 TU", 'b')]);
    println!("✓ Identical labels kept their relative order");
}

// Test that color depends only on the weekday
fn test_colors() {
    println!("\n====== Testing color classes ======");
    for day in Weekday::DAYS {
        let class = classify(&format!("Anything {}", day.name()));
        assert_eq!(class.weekday, day);
        assert_eq!(class.color_class, day.color_class());
        println!("✓ {} rows use {}", day, class.color_class);
    }
    assert_eq!(classify("Recital").color_class, Weekday::Unknown.color_class());
    println!("✓ Unknown rows use {}", Weekday::Unknown.color_class());
}

fn main() {
    test_weekday_codes();
    test_times();
    test_sorting();
    test_colors();
    println!("\nAll schedule checks passed");
}
