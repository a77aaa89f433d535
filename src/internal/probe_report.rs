#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

//! Measures probe displacement and clustering of `LinkedProbeMap` at growing
//! sizes, before and after a round of removals, and plots the results.

use linked_probe::{LinkedProbeMap, ProbeStats};
use plotters::prelude::*;
use rand::Rng;

const KEY_COUNTS: [usize; 8] = [1_000, 2_000, 5_000, 10_000, 20_000, 50_000, 100_000, 200_000];
// Share of keys removed and replaced with fresh ones in the churn phase
const CHURN_RATIO: f64 = 0.3;

const DISPLACEMENT_PLOT: &str = "probe_displacement.png";
const CLUSTER_PLOT: &str = "probe_clusters.png";
const FONT: &str = "sans-serif";

struct Sample {
    keys: usize,
    fresh: ProbeStats,
    churned: ProbeStats,
}

fn insert_random(map: &mut LinkedProbeMap<u64, u64>, keys: &mut Vec<u64>, rng: &mut impl Rng) {
    let key: u64 = rng.random();
    if map.insert(key, key) {
        keys.push(key);
    }
}

fn measure(count: usize, rng: &mut impl Rng) -> Sample {
    let mut map = LinkedProbeMap::new();
    let mut keys = Vec::with_capacity(count);
    while map.len() < count {
        insert_random(&mut map, &mut keys, rng);
    }
    let fresh = map.probe_stats();

    // Every removal compacts the cluster behind the removed key.
    let removals = (count as f64 * CHURN_RATIO) as usize;
    for _ in 0..removals {
        let key = keys.swap_remove(rng.random_range(0..keys.len()));
        map.remove(&key);
    }
    while map.len() < count {
        insert_random(&mut map, &mut keys, rng);
    }
    let churned = map.probe_stats();

    Sample { keys: count, fresh, churned }
}

fn plot(
    path: &str,
    caption: &str,
    y_desc: &str,
    samples: &[Sample],
    metric: fn(&ProbeStats) -> f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max = samples
        .iter()
        .flat_map(|sample| [metric(&sample.fresh), metric(&sample.churned)])
        .fold(0.0, f64::max)
        .max(1.0) *
        1.1; // Add 10% margin

    let labels: Vec<String> = samples.iter().map(|sample| sample.keys.to_string()).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (FONT, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..samples.len().saturating_sub(1), 0.0..max)?;

    chart
        .configure_mesh()
        .x_labels(samples.len())
        .x_label_formatter(&|x| labels.get(*x).cloned().unwrap_or_default())
        .x_desc("Number of Keys Inserted")
        .y_desc(y_desc)
        .axis_desc_style((FONT, 16))
        .draw()?;

    let series = [
        ("After inserts", RGBColor(50, 90, 220), false),
        ("After churn", RGBColor(220, 50, 50), true),
    ];
    for (name, color, churned) in series {
        let line_style = ShapeStyle::from(&color).stroke_width(2);
        let points: Vec<(usize, f64)> = samples
            .iter()
            .enumerate()
            .map(|(index, sample)| {
                let stats = if churned { &sample.churned } else { &sample.fresh };
                (index, metric(stats))
            })
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), line_style))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
        chart.draw_series(points.into_iter().map(|point| Circle::new(point, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::rng();
    let mut samples = Vec::with_capacity(KEY_COUNTS.len());

    println!("Key counts: {KEY_COUNTS:?}");
    for &count in &KEY_COUNTS {
        let sample = measure(count, &mut rng);
        println!(
            "  {:>7} keys (logical capacity {:>7}, {:>7} slots): mean displacement {:.2} -> {:.2}, \
             max {} -> {}, longest cluster {} -> {}",
            sample.keys,
            sample.churned.logical_capacity,
            sample.churned.slot_count,
            sample.fresh.mean_displacement,
            sample.churned.mean_displacement,
            sample.fresh.max_displacement,
            sample.churned.max_displacement,
            sample.fresh.longest_cluster,
            sample.churned.longest_cluster,
        );
        samples.push(sample);
    }

    plot(
        DISPLACEMENT_PLOT,
        "Mean Probe Displacement",
        "Slots between home and entry",
        &samples,
        |stats| stats.mean_displacement,
    )?;
    plot(
        CLUSTER_PLOT,
        "Longest Probe Cluster",
        "Occupied slots in a row",
        &samples,
        |stats| stats.longest_cluster as f64,
    )?;

    println!("Generated plot images: {DISPLACEMENT_PLOT}, {CLUSTER_PLOT}");
    Ok(())
}
