/// True when `candidate` is a plain dotted-quad IPv4 address such as `10.0.0.7`.
///
/// Only the canonical form counts: four decimal components of one to three
/// digits, each at most 255, with no leading zeros. Shorthand (`127.1`), hex
/// and octal forms are rejected.
pub fn is_dotted_quad(candidate: &str) -> bool {
    let mut parts = 0;
    for part in candidate.split('.') {
        parts += 1;
        if parts > 4 || !is_octet(part) {
            return false;
        }
    }
    parts == 4
}

fn is_octet(part: &str) -> bool {
    if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if part.len() > 1 && part.starts_with('0') {
        return false;
    }
    part.parse::<u16>().is_ok_and(|value| value <= 255)
}
