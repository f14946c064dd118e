/// Product identifiers shared across crates
pub const PRODUCT_NAME: &str = "coursecal";
pub const PRODUCT_VENDOR: &str = "Coursecal";
pub const DEFAULT_PRODID: &str =
    const_str::concat!("-//", PRODUCT_VENDOR, "//", PRODUCT_NAME, " timetable export//EN");

/// Civic timezone of the institution.
pub const DEFAULT_TIMEZONE: &str = "Asia/Shanghai";

/// Upper bound on the logical teaching week any course may reference.
pub const DEFAULT_MAX_LOGICAL_WEEK: u32 = 100;

/// Lesson start times, index `i` is lesson `i + 1`.
pub const DEFAULT_SLOT_TIMES: [&str; 7] =
    ["08:00", "10:10", "12:10", "14:10", "16:20", "19:00", "21:00"];

/// Start times for staggered buildings. Only lesson 2 differs.
pub const STAGGERED_SLOT_TIMES: [&str; 7] =
    ["08:00", "10:30", "12:10", "14:10", "16:20", "19:00", "21:00"];

/// Building names whose lesson 2 starts on the staggered timetable.
pub const STAGGER_KEYWORDS: [&str; 2] = ["思源西楼", "逸夫教学楼"];

pub const DEFAULT_LESSON_MINUTES: i64 = 110;

/// Evening lesson that only runs a single period.
pub const SHORT_LESSON: u8 = 7;
pub const SHORT_LESSON_MINUTES: i64 = 50;

/// Namespace for deterministic event UIDs.
pub const UID_NAMESPACE: uuid::Uuid = uuid::Uuid::from_u128(0x6f1c_2a3e_94b7_4d0b_8e55_1c7a_9d30_b2e4);

/// Host part appended to generated UIDs.
pub const UID_DOMAIN: &str = const_str::concat!(PRODUCT_NAME, ".local");
