//! Placeholder conventions shared between the packet and the importer.
//!
//! The packet stores every string with the mobile positional placeholder
//! `%1$s`. iOS files use `%@` for the same thing, so iOS values are
//! rewritten on the way into the packet and back on the way out.

/// Placeholder used by iOS `.strings` files.
pub const IOS_PLACEHOLDER: &str = "%@";

/// Placeholder used in the packet and by Android resources.
pub const MOBILE_PLACEHOLDER: &str = "%1$s";

/// Rewrites iOS `%@` placeholders to `%1$s`.
pub fn ios_to_mobile(input: &str) -> String {
    input.replace(IOS_PLACEHOLDER, MOBILE_PLACEHOLDER)
}

/// Rewrites `%1$s` placeholders to the iOS `%@`.
pub fn mobile_to_ios(input: &str) -> String {
    input.replace(MOBILE_PLACEHOLDER, IOS_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ios_to_mobile() {
        assert_eq!(ios_to_mobile("Hello %@!"), "Hello %1$s!");
        assert_eq!(ios_to_mobile("100%"), "100%");
    }

    #[test]
    fn test_mobile_to_ios() {
        assert_eq!(mobile_to_ios("Hello %1$s!"), "Hello %@!");
        assert_eq!(mobile_to_ios("%2$s and %d"), "%2$s and %d");
    }

    #[test]
    fn test_round_trip() {
        let s = "Welcome back, %@. You have %@ new messages.";
        assert_eq!(mobile_to_ios(&ios_to_mobile(s)), s);
    }
}
