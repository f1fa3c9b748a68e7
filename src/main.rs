use natal_core::{compute_natal_chart, BirthInfo, Location, NatalError};

fn main() -> Result<(), NatalError> {
    env_logger::init();

    // Example usage: 15th May 1990, 14:30 local time, Moscow
    let birth = BirthInfo::parse("15.05.1990", "14:30", "Europe/Moscow")?;

    match compute_natal_chart(&birth, &Location::moscow()) {
        Ok(chart) => {
            println!("Sun:       {}", chart.sun);
            println!("Moon:      {}", chart.moon);
            println!("Ascendant: {}", chart.ascendant);
            println!("Julian day: {:.5}", chart.julian_day);
        }
        Err(e) => eprintln!("Error: {:?}", e),
    }

    Ok(())
}
