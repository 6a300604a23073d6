// Stand-ins for rppal's GPIO and PWM types, swapped in under cfg(test).
pub mod mock_gpio;
pub mod mock_pwm;
