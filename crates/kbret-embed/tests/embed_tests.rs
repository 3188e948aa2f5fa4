use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use kbret_core::config::{EncoderBackend, EncoderSettings};
use kbret_core::traits::TextEncoder;
use kbret_embed::{select_encoder, DeadlineEncoder, HashEncoder, OllamaEncoder};

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[test]
fn hash_encoder_shapes_and_determinism() {
    let encoder = HashEncoder::new(64);
    let texts = vec!["hello world".to_string(), "Hello   WORLD".to_string()];
    let embs = encoder.encode_batch(&texts).expect("encode_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 64);
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6, "normalization makes case and spacing irrelevant");
    }
}

#[test]
fn hash_encoder_shared_tokens_are_closer() {
    let encoder = HashEncoder::new(256);
    let q = encoder.encode("reset password").unwrap();
    let near = encoder.encode("how to reset your password").unwrap();
    let far = encoder.encode("payment failed expired card").unwrap();
    assert!(cosine(&q, &near) > cosine(&q, &far));
}

#[test]
fn hash_encoder_blank_text_is_zero_vector() {
    let v = HashEncoder::new(8).encode("   ").unwrap();
    assert!(v.iter().all(|x| *x == 0.0));
}

struct SlowEncoder(Duration);

impl TextEncoder for SlowEncoder {
    fn name(&self) -> &str {
        "slow"
    }
    fn encode(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
        thread::sleep(self.0);
        Ok(vec![1.0, 0.0])
    }
}

#[test]
fn deadline_encoder_gives_up_on_slow_encoder() {
    let enc = DeadlineEncoder::new(Arc::new(SlowEncoder(Duration::from_secs(5))), Duration::from_millis(50));
    let start = Instant::now();
    let err = enc.encode("anything").expect_err("should time out");
    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(err.to_string().contains("slow"));
}

#[test]
fn deadline_encoder_passes_fast_results_through() {
    let enc = DeadlineEncoder::new(Arc::new(SlowEncoder(Duration::from_millis(1))), Duration::from_secs(5));
    assert_eq!(enc.encode("anything").expect("encode"), vec![1.0, 0.0]);
}

/// Blocks every call until the test sends a release token.
struct Gate(Mutex<mpsc::Receiver<()>>);

impl TextEncoder for Gate {
    fn name(&self) -> &str {
        "gate"
    }
    fn encode(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
        let rx = self.0.lock().map_err(|_| anyhow::anyhow!("gate poisoned"))?;
        rx.recv()?;
        Ok(vec![1.0])
    }
}

#[test]
fn deadline_encoder_caps_abandoned_workers() {
    let (release, rx) = mpsc::channel();
    let enc = DeadlineEncoder::new(Arc::new(Gate(Mutex::new(rx))), Duration::from_millis(20)).with_max_in_flight(1);

    assert!(enc.encode("first").is_err(), "times out");
    assert_eq!(enc.in_flight(), 1);

    let start = Instant::now();
    let err = enc.encode("second").expect_err("no free slot");
    assert!(start.elapsed() < Duration::from_millis(20 * 10));
    assert!(err.to_string().contains("still running"), "{err}");
    assert_eq!(enc.in_flight(), 1, "refused call spawns nothing");

    release.send(()).unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while enc.in_flight() > 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(enc.in_flight(), 0, "slot released when the worker finishes");
}

#[test]
fn ollama_encoder_unreachable_is_an_error_not_a_panic() {
    // Port 9 (discard) on localhost is not an HTTP server.
    let enc = OllamaEncoder::new("nomic-embed-text", "http://127.0.0.1:9/", Some(Duration::from_millis(500))).expect("client");
    assert_eq!(enc.name(), "ollama:nomic-embed-text");
    assert!(enc.encode("hello").is_err());
}

#[test]
fn select_encoder_follows_backend() {
    let none = EncoderSettings { backend: EncoderBackend::None, ..EncoderSettings::default() };
    let hash = EncoderSettings { backend: EncoderBackend::Hash, dim: 32, ..EncoderSettings::default() };
    if std::env::var("KBRET_USE_HASH_ENCODER").is_err() {
        assert!(select_encoder(&none).is_none());
    }
    let enc = select_encoder(&hash).expect("hash encoder");
    assert_eq!(enc.encode("x y").unwrap().len(), 32);
}
