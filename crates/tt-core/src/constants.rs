/// Fraction of theoretical taps the delivery mechanism actually performs,
/// measured from real session data (96.78%)
pub const APP_EFFICIENCY: f64 = 0.9678;

/// Fraction of delivered taps that register as a like (97.8%)
pub const REGISTRATION_RATE: f64 = 0.9780;

/// Slowest supported tap rate, in taps per second
pub const MIN_TAP_RATE: i64 = 1;

/// Fastest supported tap rate, in taps per second
pub const MAX_TAP_RATE: i64 = 20;

/// Rate assumed when no preference has been stored
pub const DEFAULT_TAP_RATE: i64 = 5;

/// Durations covered by the quick-reference table, in minutes
pub const QUICK_REFERENCE_MINUTES: [i64; 8] = [1, 3, 5, 7, 10, 15, 20, 30];
