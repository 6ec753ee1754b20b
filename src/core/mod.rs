pub mod envelope;
pub mod material_properties;
pub mod model_building;
pub mod primary_energy;
pub mod standards;
pub mod systems;
pub mod units;
