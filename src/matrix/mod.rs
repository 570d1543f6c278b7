//! Square row-major matrix views over caller-owned buffers.
//!
//! The stride always equals the matrix size: element `(r, c)` of an `n × n`
//! view lives at `r * n + c`. Buffers may be longer than `n * n`; the tail
//! is never touched.

/// Panics unless a buffer of `len` elements can hold an `n × n` matrix.
///
/// `what` names the buffer in the message. An `n` whose square overflows
/// `usize` can never fit and panics the same way.
pub fn check_len(what: &str, n: usize, len: usize) {
    match n.checked_mul(n) {
        Some(required) => assert!(
            len >= required,
            "{what}: expected at least {n}x{n}={required} elements, got {len}"
        ),
        None => panic!("{what}: expected at least {n}x{n} elements, got {len}"),
    }
}

/// Read-only `n × n` view (the `A` and `B` operands).
#[derive(Clone, Copy, Debug)]
pub struct MatrixView<'a> {
    data: &'a [f64],
    n: usize,
}

impl<'a> MatrixView<'a> {
    /// # Panics
    ///
    /// Panics if `data` holds fewer than `n * n` elements.
    pub fn new(data: &'a [f64], n: usize) -> Self {
        check_len("view", n, data.len());
        MatrixView { data, n }
    }

    /// Side length `n`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// `len` contiguous elements of row `row`, starting at column `col`.
    #[inline]
    pub fn row_segment(&self, row: usize, col: usize, len: usize) -> &'a [f64] {
        let start = row * self.n + col;
        &self.data[start..start + len]
    }
}

/// Read-write `n × n` view (the `C` operand).
#[derive(Debug)]
pub struct MatrixViewMut<'a> {
    data: &'a mut [f64],
    n: usize,
}

impl<'a> MatrixViewMut<'a> {
    /// # Panics
    ///
    /// Panics if `data` holds fewer than `n * n` elements.
    pub fn new(data: &'a mut [f64], n: usize) -> Self {
        check_len("view", n, data.len());
        MatrixViewMut { data, n }
    }

    /// Side length `n`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Read-only view of the same matrix.
    #[inline]
    pub fn as_view(&self) -> MatrixView<'_> {
        MatrixView {
            data: self.data,
            n: self.n,
        }
    }

    /// Mutable `len` elements of row `row`, starting at column `col`.
    #[inline]
    pub fn row_segment_mut(&mut self, row: usize, col: usize, len: usize) -> &mut [f64] {
        let start = row * self.n + col;
        &mut self.data[start..start + len]
    }
}
