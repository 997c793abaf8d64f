use std::env;

use scpi_psu::{
    error::Result,
    psu::ScpiPsu,
    serial::{SerialConfig, SerialTransport},
};

// Configuration constants - adjust these for your setup
const BAUD_RATE: u32 = 115200;
const OUTPUT_VOLTAGE_V: f64 = 5.5;
const CURRENT_LIMIT_A: f64 = 0.1;
const STABILIZATION_DELAY_MS: u64 = 1000;

fn main() -> Result<()> {
    let Some(port_name) = env::args().nth(1) else {
        eprintln!("Usage: serial <PORT>   e.g. /dev/ttyUSB0 or COM3");
        std::process::exit(1);
    };
    println!("Using port: {}", port_name);

    let transport: SerialTransport =
        SerialTransport::new(SerialConfig::new(port_name).baud_rate(BAUD_RATE));
    let mut psu = ScpiPsu::new(transport);
    psu.connect()?;

    println!("Identity: {}", psu.identify()?);
    psu.set_remote()?;

    psu.set_voltage(OUTPUT_VOLTAGE_V)?;
    println!("Set output voltage to {}V", OUTPUT_VOLTAGE_V);

    psu.set_current(CURRENT_LIMIT_A)?;
    println!("Set current to {}A", CURRENT_LIMIT_A);

    psu.set_output(true)?;
    println!("Output enabled: {}", psu.get_output()?);

    // Wait for output to stabilize
    std::thread::sleep(std::time::Duration::from_millis(STABILIZATION_DELAY_MS));

    let reading = psu.measure_all()?;
    println!("Measured: {:#?}", reading);

    let info = psu.measure_all_info()?;
    match info.operating_mode() {
        Ok(mode) => println!("Operating mode: {}", mode),
        Err(code) => println!("Operating mode: unknown ({})", code),
    }
    if info.any_fault() {
        println!("Protection tripped: {:#?}", info);
    }

    psu.set_output(false)?;
    psu.set_local()?;
    Ok(())
}
