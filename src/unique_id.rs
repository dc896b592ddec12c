//! Random tokens linking `aria-labelledby` to `<title>`/`<desc>` ids.

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// Default minimum token length.
pub const DEFAULT_ID_LENGTH: usize = 5;

/// Characters that are not safe inside URLs or `id` references.
const STRIPPED: [char; 4] = ['.', '/', '=', '+'];

/// Generates a random token of at least `min_length` characters.
///
/// Bytes come from the thread-local CSPRNG and are base64 encoded with
/// `.`, `/`, `=` and `+` removed. Stripping can leave the token short, so
/// more bytes are encoded and appended until the minimum is met. No
/// registry of issued tokens is kept.
pub fn generate(min_length: usize) -> String {
    let mut rng = rand::rng();
    let mut bytes = vec![0u8; min_length.max(1)];
    let mut token = String::with_capacity(min_length + 4);

    loop {
        rng.fill_bytes(&mut bytes);
        token.extend(STANDARD.encode(&bytes).chars().filter(|c| !STRIPPED.contains(c)));

        if !token.is_empty() && token.len() >= min_length {
            return token;
        }
    }
}
