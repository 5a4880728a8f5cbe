use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Reusable path buffer that splices child names onto a fixed parent.
///
/// The parent prefix, with its trailing separator, is written once; each
/// [`set`](Self::set) truncates back to the prefix and appends the next
/// name, so walking a large listing builds every child path without
/// reallocating per entry.
pub(crate) struct ChildPath {
    buf: Vec<u8>,
    prefix: usize,
}

impl ChildPath {
    pub(crate) fn new(parent: &Path) -> Self {
        let mut buf = parent.as_os_str().as_bytes().to_vec();
        if buf.last() != Some(&b'/') {
            buf.push(b'/');
        }
        let prefix = buf.len();
        Self { buf, prefix }
    }

    pub(crate) fn set(&mut self, name: &OsStr) -> &Path {
        self.buf.truncate(self.prefix);
        self.buf.extend_from_slice(name.as_bytes());
        Path::new(OsStr::from_bytes(&self.buf))
    }
}
