//! Extensions to the `stm32f1xx-hal` Hardware Abstraction Layer.

pub mod tim;

#[allow(non_camel_case_types)]
pub mod pins {
    use stm32f1xx_hal::gpio::{Alternate, Analog, Output, Pin, PushPull, CRH, CRL};

    pub type A0_ADC1C0_SENSE = Pin<Analog, CRL, 'A', 0>;
    pub type A1_TIM2C2_DRIVE = Pin<Alternate<PushPull>, CRL, 'A', 1>;
    pub type A6_TIM3C1 = Pin<Alternate<PushPull>, CRL, 'A', 6>;
    pub type A7_TIM3C2 = Pin<Alternate<PushPull>, CRL, 'A', 7>;
    pub type B0_TIM3C3 = Pin<Alternate<PushPull>, CRL, 'B', 0>;
    pub type B1_TIM3C4 = Pin<Alternate<PushPull>, CRL, 'B', 1>;
    pub type C13_DEBUG_LED = Pin<Output<PushPull>, CRH, 'C', 13>;
}
