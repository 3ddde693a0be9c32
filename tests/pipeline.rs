//! End-to-end scenarios: load into the store, chain operators, write back.

use pixelforge::{
    ColorMatrix, Image, ImageStore, Kernel, Operation, Pixel, ProcessorError, Reducer,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn random_image(rng: &mut StdRng, width: usize, height: usize) -> Image {
    let grid: Vec<Vec<Pixel>> = (0..height)
        .map(|_| {
            (0..width)
                .map(|_| Pixel::rgb(rng.gen(), rng.gen(), rng.gen()))
                .collect()
        })
        .collect();
    Image::from_grid(&grid).unwrap()
}

#[test]
fn test_store_round_trip_with_operators() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(7);
    let mut store = ImageStore::new();
    store.add("koala", random_image(&mut rng, 12, 9));

    for name in Operation::NAMES {
        let op: Operation = name.parse().unwrap();
        let out = store.get("koala").unwrap().apply(&op);
        store.add(format!("koala-{name}"), out);
    }
    assert_eq!(store.count(), 1 + Operation::NAMES.len());

    let red = store.get("koala-red-component").unwrap();
    let base = store.get("koala").unwrap();
    for (a, b) in red.pixels().zip(base.pixels()) {
        assert_eq!(a, Pixel::gray(b.red()));
    }
}

#[test]
fn test_missing_name_is_not_found() {
    let store = ImageStore::new();
    assert!(matches!(store.get("ghost"), Err(ProcessorError::NotFound(_))));
}

#[test]
fn test_downscale_uniform_100_to_10x20() {
    init_tracing();
    let img = Image::fill(100, 100, Pixel::rgb(50, 60, 70)).unwrap();
    let small = img.downscale(10, 20).unwrap();
    assert_eq!(small.width(), 10);
    assert_eq!(small.height(), 20);
    // tolerant comparison, value within 1
    assert_eq!(small, Image::fill(10, 20, Pixel::rgb(50, 60, 70)).unwrap());
}

#[test]
fn test_flips_are_involutions() {
    let mut rng = StdRng::seed_from_u64(21);
    for _ in 0..20 {
        let (w, h) = (rng.gen_range(1..16), rng.gen_range(1..16));
        let img = random_image(&mut rng, w, h);
        assert!(img.flip_horizontal().flip_horizontal().exact_eq(&img));
        assert!(img.flip_vertical().flip_vertical().exact_eq(&img));
    }
}

#[test]
fn test_brighten_examples() {
    let p = Pixel::rgb(50, 60, 70);
    assert_eq!(p.brighten_darken(10), Pixel::rgb(60, 70, 80));
    assert_eq!(p.brighten_darken(210), Pixel::WHITE);
    assert_eq!(p.brighten_darken(-300), Pixel::BLACK);
}

#[test]
fn test_mask_selects_whole_image() {
    let mut rng = StdRng::seed_from_u64(3);
    let img = random_image(&mut rng, 8, 6);
    let black = Image::fill(8, 6, Pixel::BLACK).unwrap();
    let white = Image::fill(8, 6, Pixel::WHITE).unwrap();

    for op in Operation::all_named() {
        assert!(img.masked(&black, &op).unwrap().exact_eq(&img.apply(&op)));
        assert!(img.masked(&white, &op).unwrap().exact_eq(&img));
    }
}

#[test]
fn test_mask_half_and_half() {
    let img = Image::fill(4, 2, Pixel::rgb(100, 100, 100)).unwrap();
    let mask = Image::from_grid(&[vec![Pixel::BLACK; 4], vec![Pixel::WHITE; 4]]).unwrap();
    let out = img.masked(&mask, &Operation::sepia()).unwrap();
    for col in 0..4 {
        assert_eq!(out.pixel(0, col), Pixel::rgb(135, 120, 94));
        assert_eq!(out.pixel(1, col), Pixel::rgb(100, 100, 100));
    }
}

#[test]
fn test_chained_pipeline_keeps_dimensions() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(99);
    let img = random_image(&mut rng, 20, 15);

    let out = img
        .apply(&Operation::blur())
        .apply(&Operation::from(Reducer::Luma))
        .flip_horizontal()
        .mosaic(10, &mut rng)
        .unwrap()
        .downscale(10, 5)
        .unwrap()
        .apply(&Operation::sharpen());

    assert_eq!(out.dim(), (5, 10));
    assert!(out.pixels().all(|p| p.red() == p.green() && p.green() == p.blue()));
}

#[test]
fn test_mosaic_color_count_bounded() {
    let mut rng = StdRng::seed_from_u64(5);
    let img = random_image(&mut rng, 16, 16);
    for k in [1, 4, 17] {
        let out = img.mosaic(k, &mut rng).unwrap();
        let mut colors: Vec<Pixel> = out.pixels().collect();
        colors.sort_by_key(|p| p.channels());
        colors.dedup();
        assert!(colors.len() <= k);
    }
    assert!(matches!(img.mosaic(0, &mut rng), Err(ProcessorError::InvalidArgument(_))));
}

#[test]
fn test_custom_operations() {
    let swap = ColorMatrix::from_rows(&[
        vec![0.0, 0.0, 1.0],
        vec![0.0, 1.0, 0.0],
        vec![1.0, 0.0, 0.0],
    ])
    .unwrap();
    let identity = Kernel::from_rows(&[vec![1.0]]).unwrap();

    let img = Image::fill(3, 3, Pixel::rgb(10, 20, 30)).unwrap();
    let swapped = img.apply(&Operation::from(swap));
    assert!(swapped.pixels().all(|p| p == Pixel::rgb(30, 20, 10)));
    assert!(img.apply(&Operation::from(identity)).exact_eq(&img));
}

#[test]
fn test_histogram_sums_to_area() {
    let mut rng = StdRng::seed_from_u64(13);
    let img = random_image(&mut rng, 11, 7);
    let hist = img.histogram();
    for table in [&hist.red, &hist.green, &hist.blue, &hist.intensity] {
        assert_eq!(table.iter().sum::<u32>(), 77);
    }
}
