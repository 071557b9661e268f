use thiserror::Error;

/// Characters allowed in a host address besides ASCII alphanumerics.
///
/// Covers DNS names, IPv4, bracketed or bare IPv6 and zone identifiers.
const HOST_PUNCTUATION: &str = ".-:[]%_";

/// Reasons a host address is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("host address must not be empty")]
    Empty,

    #[error("host address {address:?} contains invalid character {found:?}")]
    InvalidCharacter { address: String, found: char },
}

/// Validates a hostname or IP address supplied by the operator.
///
/// Host addresses end up in a remote shell command line, so anything outside
/// a conservative character set is rejected.
///
/// # Errors
///
/// Returns an error if `address` is empty or contains a character that is not
/// valid in a hostname or IP literal.
pub fn validate_host_address(address: &str) -> Result<(), AddressError> {
    if address.is_empty() {
        return Err(AddressError::Empty);
    }
    if let Some(found) = address
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !HOST_PUNCTUATION.contains(*c))
    {
        return Err(AddressError::InvalidCharacter {
            address: address.to_string(),
            found,
        });
    }
    Ok(())
}

/// Parses and validates a host address, returning it owned.
///
/// Shaped for use as a `clap` value parser.
///
/// # Errors
///
/// See [`validate_host_address`].
pub fn parse_host_address(address: &str) -> Result<String, AddressError> {
    validate_host_address(address)?;
    Ok(address.to_string())
}
