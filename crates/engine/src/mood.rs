use chronos_core::Mood;

/// Highest risk still classified as [`Mood::Calm`].
pub const CALM_CEILING: f64 = 40.0;
/// Highest risk still classified as [`Mood::Uneasy`].
pub const UNEASY_CEILING: f64 = 70.0;

/// Map a risk score onto a mood. Boundaries belong to the lower state.
pub fn classify(risk: f64) -> Mood {
    if risk <= CALM_CEILING {
        Mood::Calm
    } else if risk <= UNEASY_CEILING {
        Mood::Uneasy
    } else {
        Mood::Panic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive_on_lower_state() {
        assert_eq!(classify(0.0), Mood::Calm);
        assert_eq!(classify(40.0), Mood::Calm);
        assert_eq!(classify(40.1), Mood::Uneasy);
        assert_eq!(classify(70.0), Mood::Uneasy);
        assert_eq!(classify(70.1), Mood::Panic);
        assert_eq!(classify(100.0), Mood::Panic);
    }
}
