use criterion::{criterion_group, criterion_main, Criterion};

use certus::ball::{ComplexBall, RealBall};
use certus::bernoulli::bernoulli_multi_mod;
use certus::rising::{rising_with_strategy, Strategy};
use certus::{digamma_real, gamma, gamma_real, log_gamma};

// ---------------------------------------------------------------------------
// Rising factorial: the three strategies on the same inputs
// ---------------------------------------------------------------------------

fn rising_strategies(c: &mut Criterion) {
    let x = RealBall::from_f64(0.75);

    for (m, prec) in [(64u64, 256u32), (512, 1024)] {
        let mut g = c.benchmark_group(format!("rising_m{m}_p{prec}"));

        g.bench_function("simple", |b| {
            b.iter(|| {
                std::hint::black_box(rising_with_strategy(&x, m, Strategy::Simple, prec))
            })
        });

        g.bench_function("eight", |b| {
            b.iter(|| {
                std::hint::black_box(rising_with_strategy(&x, m, Strategy::EightTerm, prec))
            })
        });

        g.bench_function("rectangular", |b| {
            let step = (m as f64).sqrt() as u64;
            b.iter(|| {
                std::hint::black_box(rising_with_strategy(
                    &x,
                    m,
                    Strategy::Rectangular { step },
                    prec,
                ))
            })
        });

        g.finish();
    }
}

// ---------------------------------------------------------------------------
// Bernoulli: residue/refinement split
// ---------------------------------------------------------------------------

fn bernoulli_alpha(c: &mut Criterion) {
    let mut g = c.benchmark_group("bernoulli_600");
    g.sample_size(10);

    for alpha in [0.0, 0.3, 1.0] {
        g.bench_function(format!("alpha_{alpha}"), |b| {
            b.iter(|| std::hint::black_box(bernoulli_multi_mod(600, Some(alpha))))
        });
    }

    g.finish();
}

// ---------------------------------------------------------------------------
// Gamma family across precisions
// ---------------------------------------------------------------------------

fn gamma_precisions(c: &mut Criterion) {
    let x = RealBall::from_f64(3.7);
    let z = ComplexBall::from_f64s(-8.25, 3.5);

    for prec in [64u32, 256, 1024] {
        let mut g = c.benchmark_group(format!("gamma_p{prec}"));
        g.sample_size(20);

        g.bench_function("real", |b| {
            b.iter(|| std::hint::black_box(gamma_real(&x, prec)))
        });

        g.bench_function("real_digamma", |b| {
            b.iter(|| std::hint::black_box(digamma_real(&x, prec)))
        });

        g.bench_function("complex_reflected", |b| {
            b.iter(|| std::hint::black_box(gamma(&z, prec)))
        });

        g.bench_function("complex_log", |b| {
            b.iter(|| std::hint::black_box(log_gamma(&z, prec)))
        });

        g.finish();
    }
}

criterion_group!(benches, rising_strategies, bernoulli_alpha, gamma_precisions);
criterion_main!(benches);
