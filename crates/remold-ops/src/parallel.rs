//! Row dispatch shared by every kernel.
//!
//! With the `parallel` feature (default) rows are handed to rayon; without it
//! the same closure runs in a plain loop. Kernels never see the difference.

use remold_core::{RasterBuffer, Rect};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `f(y, row)` for each `stride`-sized row of `data`, numbering rows
/// from `first_row`.
#[cfg(feature = "parallel")]
pub(crate) fn for_each_row<T, F>(data: &mut [T], stride: usize, first_row: u32, f: F)
where
    T: Send,
    F: Fn(u32, &mut [T]) + Sync + Send,
{
    data.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(i, row)| f(first_row + i as u32, row));
}

/// Calls `f(y, row)` for each `stride`-sized row of `data` (single-threaded fallback).
#[cfg(not(feature = "parallel"))]
pub(crate) fn for_each_row<T, F>(data: &mut [T], stride: usize, first_row: u32, f: F)
where
    T: Send,
    F: Fn(u32, &mut [T]) + Sync + Send,
{
    for (i, row) in data.chunks_mut(stride).enumerate() {
        f(first_row + i as u32, row);
    }
}

/// Runs `f(x, y) -> pixel` over every pixel of `rect` in `dst`.
///
/// `rect` must already be clipped to `dst`.
pub(crate) fn shade_rect<F>(dst: &mut RasterBuffer, rect: Rect, f: F)
where
    F: Fn(u32, u32) -> [u8; 4] + Sync + Send,
{
    if rect.is_empty() {
        return;
    }
    let stride = dst.stride();
    let rows = dst.rows_mut(rect.y, rect.bottom());
    for_each_row(rows, stride, rect.y, |y, row| {
        for x in rect.x..rect.right() {
            let i = x as usize * 4;
            row[i..i + 4].copy_from_slice(&f(x, y));
        }
    });
}
