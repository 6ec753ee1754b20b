use crate::core::units::{kilojoules_to_mj, DAYS_PER_YEAR};

/// This module contains data on the properties of materials heated by building services.

#[derive(Clone, Copy, Debug)]
pub struct MaterialProperties {
    density: f64,                // kg/litre
    specific_heat_capacity: f64, // kJ/(kg.K)
}

impl MaterialProperties {
    pub const fn new(density: f64, specific_heat_capacity: f64) -> Self {
        Self {
            density,
            specific_heat_capacity,
        }
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn specific_heat_capacity(&self) -> f64 {
        self.specific_heat_capacity
    }

    /// kJ needed to raise one litre of the material by one kelvin
    pub fn volumetric_heat_capacity(&self) -> f64 {
        self.density * self.specific_heat_capacity
    }

    /// Return energy needed to heat a volume of material, in MJ
    ///
    /// Arguments:
    /// * `litres` - volume of material heated
    /// * `temperature_rise` - temperature increase applied to the volume, in K
    pub fn energy_to_heat_mj(&self, litres: f64, temperature_rise: f64) -> f64 {
        kilojoules_to_mj(litres * temperature_rise * self.volumetric_heat_capacity())
    }

    /// Return annual energy needed to heat a constant daily volume, in MJ/year
    pub fn annual_energy_to_heat_mj(&self, litres_per_day: f64, temperature_rise: f64) -> f64 {
        self.energy_to_heat_mj(litres_per_day * DAYS_PER_YEAR as f64, temperature_rise)
    }
}

pub const WATER: MaterialProperties = MaterialProperties::new(1.0, 4.18);
