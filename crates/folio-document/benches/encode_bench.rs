// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for bitmap encoding in the folio-document crate.
// Encodes a synthetic page close to US Letter at zoom 1.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use folio_core::config::ChannelOrder;
use folio_document::{Bitmap, BmpEncoder};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// A 611x792 RGBA gradient. 611 * 3 bytes is not a multiple of 4, so 24-bit
/// rows carry one padding byte.
fn letter_page() -> Bitmap {
    let (width, height) = (611u32, 792u32);
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 255]);
        }
    }
    match Bitmap::from_rgba(width, height, data) {
        Ok(bitmap) => bitmap,
        Err(err) => panic!("fixture bitmap: {err}"),
    }
}

fn bench_bmp_encode(c: &mut Criterion) {
    let page = letter_page();

    c.bench_function("bmp_encode_24bit (611x792)", |b| {
        let encoder = BmpEncoder::default();
        b.iter(|| black_box(encoder.encode(black_box(&page))));
    });

    c.bench_function("bmp_encode_32bit (611x792)", |b| {
        let encoder = match BmpEncoder::with_channels(4, ChannelOrder::Bgr) {
            Ok(encoder) => encoder,
            Err(err) => panic!("encoder: {err}"),
        };
        b.iter(|| black_box(encoder.encode(black_box(&page))));
    });
}

/// Fingerprinting hashes the whole buffer; it runs on every determinism check.
fn bench_fingerprint(c: &mut Criterion) {
    let page = letter_page();
    c.bench_function("bitmap_fingerprint (611x792)", |b| {
        b.iter(|| black_box(page.fingerprint()));
    });
}

criterion_group!(benches, bench_bmp_encode, bench_fingerprint);
criterion_main!(benches);
