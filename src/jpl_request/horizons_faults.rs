/// Messages Horizons prints instead of an ephemeris when it rejects a request,
/// paired with a hint on the parameter to check.
const HORIZONS_FAULTS: [(&str, &str); 11] = [
    (
        "Cannot use print-out interval <= zero",
        "confirm a valid, positive step size",
    ),
    (
        "Bad dates -- start must be earlier than stop",
        "check the start and stop times",
    ),
    (
        "Cannot interpret date. Type \"?!\" or try YYYY-MMM-DD {HH:MN} format",
        "check the date format",
    ),
    (
        "Cannot interpret date. Type \"?!\" or try YYYY-Mon-Dy {HH:MM} format.",
        "check the date format",
    ),
    (
        "No matches found.",
        "verify the target body against https://ssd.jpl.nasa.gov/horizons/app.html#/",
    ),
    (
        "Use ID# to make unique selection",
        "use a precise ID# to narrow the target body search",
    ),
    (
        "No site matches. Use \"*@body\" to list, \"c@body\" to enter coords, ?! for help.",
        "check the observer location and centre",
    ),
    (
        "Observer table for observer=target disallowed.",
        "the target cannot be the observer body",
    ),
    (
        "Unknown units specification -- re-enter",
        "check the step size unit",
    ),
    (
        "exceeds 90024 line max -- change step-size",
        "Horizons prints at most 90024 rows, increase the step size",
    ),
    (
        "Unknown quantity requested",
        "check the requested quantities",
    ),
];

/// Look for a known Horizons fault message in a response
///
/// Argument
/// --------
/// * `response`: raw text returned by the Horizons API
///
/// Return
/// ------
/// * a description of the fault and how to fix it, `None` if no known fault is present
pub fn detect_horizons_fault(response: &str) -> Option<String> {
    HORIZONS_FAULTS
        .iter()
        .find(|(message, _)| response.contains(message))
        .map(|(message, hint)| format!("Horizons reports '{message}': {hint}"))
}

#[cfg(test)]
mod horizons_faults_test {
    use super::*;

    #[test]
    fn test_detect_fault() {
        let response = "API VERSION: 1.2\n*****\n    No matches found.\n";
        let fault = detect_horizons_fault(response).unwrap();
        assert!(fault.contains("No matches found."));
        assert!(fault.contains("target body"));
    }

    #[test]
    fn test_no_fault() {
        assert_eq!(detect_horizons_fault("$$SOE\n$$EOE\n"), None);
    }
}
