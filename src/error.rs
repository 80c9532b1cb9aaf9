/// Conditions that end the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The magnetometer could not deliver a sample. Fatal for this run.
    Sensor(E),
}

impl<E> Error<E> {
    pub fn into_inner(self) -> E {
        match self {
            Error::Sensor(e) => e,
        }
    }
}
