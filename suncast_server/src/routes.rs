pub mod sun_forecast;
