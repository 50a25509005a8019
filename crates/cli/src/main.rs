use std::sync::Arc;

use clap::Parser;
use rtpdata::{
    DataEngine, DataMediaChannel, DataReceiver, ManualClock, NetworkSink, ReceiveDataParams,
    SendDataParams, StreamParams,
};

#[derive(Parser)]
#[command(
    name = "rtpdata-demo",
    about = "Send messages through a looped-back RTP data channel"
)]
struct Args {
    /// Stream SSRC used for both directions
    #[arg(long, default_value_t = 42)]
    ssrc: u32,

    /// Seconds the manual clock advances between messages
    #[arg(long, default_value_t = 1.0)]
    tick: f64,

    /// Messages to send
    #[arg(default_values_t = [String::from("hello"), String::from("world")])]
    messages: Vec<String>,
}

struct PrintingReceiver;

impl DataReceiver for PrintingReceiver {
    fn receive_data(&self, params: &ReceiveDataParams, data: &[u8]) {
        println!(
            "ssrc={} seq={} ts={} payload={:?}",
            params.ssrc,
            params.sequence,
            params.timestamp,
            String::from_utf8_lossy(data)
        );
    }
}

/// Sink that feeds the sending channel's packets straight into the
/// receiving channel, standing in for a network.
struct Loopback {
    peer: Arc<DataMediaChannel>,
}

impl NetworkSink for Loopback {
    fn send_packet(&self, packet: &[u8]) -> std::io::Result<()> {
        self.peer.on_packet_received(packet);
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let clock = Arc::new(ManualClock::new());
    let engine = DataEngine::with_clock(clock.clone());
    let codecs = engine.codecs().to_vec();

    let mut rx = engine.create_channel();
    rx.set_receive(true);
    rx.set_recv_codecs(&codecs).expect("recv codec negotiation");
    rx.add_recv_stream(StreamParams::with_ssrc(args.ssrc))
        .expect("recv stream");
    rx.set_receiver(args.ssrc, Arc::new(PrintingReceiver));

    let mut tx = engine.create_channel();
    tx.set_sink(Arc::new(Loopback { peer: Arc::new(rx) }));
    tx.set_send(true);
    tx.add_send_stream(StreamParams::with_ssrc(args.ssrc))
        .expect("send stream");
    tx.set_send_codecs(&codecs).expect("send codec negotiation");

    for message in &args.messages {
        if let Err(e) = tx.send_data(SendDataParams { ssrc: args.ssrc }, message.as_bytes()) {
            eprintln!("send failed: {}", e);
            return;
        }
        clock.advance(args.tick);
    }
}
