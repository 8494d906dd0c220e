//! Draw a sine curve on a running plot backend.
//!
//! Start the backend listening on 127.0.0.1:8080 first, then:
//!
//! ```text
//! cargo run --example sine_plot -- [port] [output path]
//! ```

use plotwire::{DEFAULT_PORT, PlotClient, TransportConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let mut args = std::env::args().skip(1);
    let port = match args.next() {
        Some(raw) => raw.parse()?,
        None => DEFAULT_PORT,
    };
    let output = args.next().unwrap_or_else(|| "/tmp/sine.png".to_owned());

    let mut client = PlotClient::new(TransportConfig::new("127.0.0.1", port));
    client.connect()?;

    let xs: Vec<f64> = (1..=100).map(|i| f64::from(i) * 0.1 - 0.01).collect();
    let ys: Vec<f64> = xs.iter().map(|x| x.sin()).collect();

    client.new_figure(8.0, 6.0)?;
    client.store_x(&xs)?;
    client.store_y(&ys)?;

    client.add_opt("c", "black")?;
    client.add_opt("linestyle", "--")?;
    client.plot_xy("Data")?;

    client.reset_opt()?;
    client.add_opt("c", "blue")?;
    client.scatter_xy("Points")?;

    client.legend()?;
    client.title("My Figure!")?;
    client.axis_labels("", "Y axis?")?;
    client.xlim(0.0, 10.0)?;
    client.save_fig(&output)?;
    client.exit()?;
    client.close()?;

    let metrics = plotwire::metrics::snapshot();
    println!(
        "sent {} frames ({} bytes) to port {port}, figure saved to {output}",
        metrics.frames_sent, metrics.bytes_sent
    );

    Ok(())
}
