//! Inbound routing benchmark suite.
//!
//! Measures the core's per-frame cost for each inbound message kind and for
//! a send/acknowledge cycle, in virtual time with no-op collaborators.
//!
//! Run with: cargo bench --bench routing
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use stand_control::scheduler::ManualScheduler;
use stand_control::transport::Transport;
use stand_control::{
    ClientConfig, ClientContext, ClientEvent, Command, Renderer, Result, Sensor, SessionId,
    StatusView, SystemType,
};
use url::Url;

// ============================================================================
// No-op Collaborators
// ============================================================================

struct NullTransport;

impl Transport for NullTransport {
    fn open(&mut self, _session: SessionId, _endpoint: &Url) -> Result<()> {
        Ok(())
    }

    fn send(&mut self, text: String) -> Result<()> {
        black_box(text);
        Ok(())
    }

    fn close(&mut self) {}
}

struct NullRenderer;

impl Renderer for NullRenderer {
    fn set_connected(&mut self, connected: bool) {
        black_box(connected);
    }

    fn show_notice(&mut self, message: &str) {
        black_box(message);
    }

    fn render_status(&mut self, view: &StatusView) {
        black_box(view);
    }

    fn render_sensor(&mut self, sensor: Sensor, reading: Option<f64>) {
        black_box((sensor, reading));
    }

    fn render_rpm(&mut self, rpm: i64) {
        black_box(rpm);
    }
}

type BenchContext = ClientContext<ManualScheduler, NullTransport, NullRenderer>;

fn open_context() -> BenchContext {
    let config = ClientConfig::for_origin("http://192.168.4.1").expect("valid origin");
    let mut ctx = ClientContext::new(
        config,
        ManualScheduler::starting_at(1_700_000_000_000),
        NullTransport,
        NullRenderer,
    );
    ctx.start();
    let session = ctx.session_id().expect("session");
    ctx.dispatch(ClientEvent::Opened(session));
    ctx
}

// ============================================================================
// Benchmark Parameters
// ============================================================================

const FRAMES: &[(&str, &str)] = &[
    (
        "status",
        r#"{"type":"status","systemRunning":true,"systemType":"carrier","autoRunEnabled":false,
            "ledState":true,"hallRpm":1523.7,"indRpm":0,"returnAirTemp":35.2,
            "dischargeAirTemp":28.1,"ambientTemp":22.0,"coolantTemp":85.5,"coilTemp":-2.5,
            "redundantAirTemp":35.0,"suctionPressure":35.5,"dischargePressure":180.2}"#,
    ),
    (
        "event",
        r#"{"type":"event","eventType":"rpmChanged","message":"Changed to 1800 RPM","timestamp":123456}"#,
    ),
    (
        "rpm_update",
        r#"{"type":"rpmUpdate","activeRpm":1523.7,"hallRpm":1523.7,"indRpm":0}"#,
    ),
    ("unknown", r#"{"type":"telemetry","payload":[1,2,3]}"#),
    ("malformed", r#"{"type":"status","#),
];

// ============================================================================
// Benchmark: Inbound Routing
// ============================================================================

fn bench_route_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_message");

    for &(kind, frame) in FRAMES {
        let mut ctx = open_context();
        group.bench_with_input(BenchmarkId::new("kind", kind), frame, |b, frame| {
            b.iter(|| ctx.route_message(black_box(frame)));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Send and Acknowledge
// ============================================================================

fn bench_send_acknowledge(c: &mut Criterion) {
    let mut ctx = open_context();
    let command = Command::run(SystemType::carrier());

    c.bench_function("send_acknowledge", |b| {
        b.iter(|| {
            ctx.send_command(black_box(command.clone()));
            let id = ctx
                .pending()
                .iter()
                .map(|entry| entry.id)
                .max()
                .expect("pending command");
            ctx.route_message(&format!(
                r#"{{"type":"response","commandId":{id},"status":"ok"}}"#
            ));
        });
    });
}

criterion_group!(benches, bench_route_message, bench_send_acknowledge);
criterion_main!(benches);
