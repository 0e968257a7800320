use std::borrow::Cow;

/// XOR `data` with `salt` repeated from the first byte of `data`.
///
/// An empty salt leaves the data untouched (and unallocated).
pub fn apply_salt<'a>(data: &'a [u8], salt: &[u8]) -> Cow<'a, [u8]> {
    if salt.is_empty() {
        return Cow::Borrowed(data);
    }
    let mut out = data.to_vec();
    salt_in_place(&mut out, salt, 0);
    Cow::Owned(out)
}

/// XOR `buf` with `salt`, treating `buf[0]` as position `offset` of the
/// salted stream.
pub fn salt_in_place(buf: &mut [u8], salt: &[u8], offset: usize) {
    if salt.is_empty() {
        return;
    }
    for (i, byte) in buf.iter_mut().enumerate() {
        *byte ^= salt[(offset + i) % salt.len()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_salt_borrows() {
        let data = b"payload";
        assert!(matches!(apply_salt(data, &[]), Cow::Borrowed(_)));
    }

    #[test]
    fn salt_repeats_cyclically() {
        let salted = apply_salt(&[0, 0, 0, 0, 0], &[1, 2]);
        assert_eq!(&*salted, &[1, 2, 1, 2, 1]);
    }

    #[test]
    fn salting_twice_restores_data() {
        let data = b"some bytes to salt".to_vec();
        let once = apply_salt(&data, b"k3y").into_owned();
        let twice = apply_salt(&once, b"k3y").into_owned();
        assert_eq!(twice, data);
    }

    #[test]
    fn offset_continues_the_salt_stream() {
        let data = [0u8; 6];
        let whole = apply_salt(&data, &[1, 2, 3, 4]).into_owned();
        let mut tail = [0u8; 3];
        salt_in_place(&mut tail, &[1, 2, 3, 4], 3);
        assert_eq!(&whole[3..], &tail);
    }
}
