//! Berger (1978) trigonometric expansions of the orbital elements.
//!
//! Each term is `(amplitude, frequency, phase)`. Frequencies are in arcsec/yr and
//! phases in degrees, referenced to 1950 AD.

/// One term of a harmonic series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct HarmonicTerm {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
}

impl HarmonicTerm {
    const fn new(amplitude: f64, frequency: f64, phase: f64) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
        }
    }

    /// Argument of the term, in radians, `t` years after 1950.
    pub fn argument(&self, t: f64) -> f64 {
        (self.frequency / 3600.0 * t + self.phase).to_radians()
    }
}

/// Constant part of the obliquity series (degrees).
pub(super) const EPSILON_STAR: f64 = 23.320556;

/// Linear rate of the general precession (arcsec/yr).
pub(super) const PSI_BAR: f64 = 50.439273;

/// Constant of the general precession (degrees).
pub(super) const ZETA: f64 = 3.392506;

/// `e sin(pi)` / `e cos(pi)` expansion. Amplitudes are dimensionless.
pub(super) const ECCENTRICITY_TERMS: [HarmonicTerm; 19] = [
    HarmonicTerm::new(0.01860798, 4.207205, 28.620089),
    HarmonicTerm::new(0.01627522, 7.346091, 193.788772),
    HarmonicTerm::new(-0.0130066, 17.857263, 308.307024),
    HarmonicTerm::new(0.00988829, 17.220546, 320.199637),
    HarmonicTerm::new(-0.003367, 16.846733, 279.376984),
    HarmonicTerm::new(0.00333077, 5.199079, 87.195),
    HarmonicTerm::new(-0.002354, 18.231076, 349.129677),
    HarmonicTerm::new(0.00140015, 26.216758, 128.443387),
    HarmonicTerm::new(0.001007, 6.359169, 154.14388),
    HarmonicTerm::new(0.000857, 16.210016, 291.269597),
    HarmonicTerm::new(0.0006499, 3.065181, 114.860583),
    HarmonicTerm::new(0.000599, 16.583829, 332.092251),
    HarmonicTerm::new(0.000378, 18.49398, 296.414411),
    HarmonicTerm::new(-0.000337, 6.190953, 145.76991),
    HarmonicTerm::new(0.000276, 18.867793, 337.237063),
    HarmonicTerm::new(0.000182, 17.425567, 152.092288),
    HarmonicTerm::new(-0.000174, 6.186001, 126.839891),
    HarmonicTerm::new(-0.000124, 18.417441, 210.667199),
    HarmonicTerm::new(1.25e-05, 0.667863, 72.108838),
];

/// Obliquity expansion. Amplitudes are in arcsec.
pub(super) const OBLIQUITY_TERMS: [HarmonicTerm; 47] = [
    HarmonicTerm::new(-2462.2214466, 31.609974, 251.9025),
    HarmonicTerm::new(-857.3232075, 32.620504, 280.8325),
    HarmonicTerm::new(-629.3231835, 24.172203, 128.3057),
    HarmonicTerm::new(-414.2804924, 31.983787, 292.7252),
    HarmonicTerm::new(-311.7632587, 44.828336, 15.3747),
    HarmonicTerm::new(308.9408604, 30.973257, 263.7951),
    HarmonicTerm::new(-162.5533601, 43.668246, 308.4258),
    HarmonicTerm::new(-116.1077911, 32.246691, 240.0099),
    HarmonicTerm::new(101.1189923, 30.599444, 222.9725),
    HarmonicTerm::new(-67.6856209, 42.681324, 268.7809),
    HarmonicTerm::new(24.9079067, 43.836462, 316.7998),
    HarmonicTerm::new(22.5811241, 47.439436, 319.6024),
    HarmonicTerm::new(-21.1648355, 63.219948, 143.805),
    HarmonicTerm::new(-15.6549876, 64.230478, 172.7351),
    HarmonicTerm::new(15.3936813, 1.01053, 28.93),
    HarmonicTerm::new(14.6660938, 7.437771, 123.5968),
    HarmonicTerm::new(-11.7273029, 55.782177, 20.2082),
    HarmonicTerm::new(10.2742696, 0.373813, 40.8226),
    HarmonicTerm::new(6.4914588, 13.218362, 123.4722),
    HarmonicTerm::new(5.8539148, 62.583231, 155.6977),
    HarmonicTerm::new(-5.4872205, 63.593761, 184.6277),
    HarmonicTerm::new(-5.4290191, 76.43831, 267.2772),
    HarmonicTerm::new(5.160957, 45.815258, 55.0196),
    HarmonicTerm::new(5.0786314, 8.448301, 152.5268),
    HarmonicTerm::new(-4.0735782, 56.792707, 49.1382),
    HarmonicTerm::new(3.7227167, 49.747842, 204.6609),
    HarmonicTerm::new(3.3971932, 12.058272, 56.5233),
    HarmonicTerm::new(-2.8347004, 75.27822, 200.3284),
    HarmonicTerm::new(-2.6550721, 65.241008, 201.6651),
    HarmonicTerm::new(-2.5717867, 64.604291, 213.5577),
    HarmonicTerm::new(-2.4712188, 1.647247, 17.0374),
    HarmonicTerm::new(2.462541, 7.811584, 164.4194),
    HarmonicTerm::new(2.2464112, 12.207832, 94.5422),
    HarmonicTerm::new(-2.0755511, 63.856665, 131.9124),
    HarmonicTerm::new(-1.9713669, 56.15599, 61.0309),
    HarmonicTerm::new(-1.8813061, 77.44884, 296.2073),
    HarmonicTerm::new(-1.8468785, 6.801054, 135.4894),
    HarmonicTerm::new(1.8186742, 62.209418, 114.875),
    HarmonicTerm::new(1.7601888, 20.656133, 247.0691),
    HarmonicTerm::new(-1.5428851, 48.344406, 256.6114),
    HarmonicTerm::new(1.4738838, 55.14546, 32.1008),
    HarmonicTerm::new(-1.4593669, 69.000539, 143.6804),
    HarmonicTerm::new(1.4192259, 11.07138, 16.8784),
    HarmonicTerm::new(-1.181898, 74.291298, 160.6835),
    HarmonicTerm::new(1.1756474, 11.047742, 27.5932),
    HarmonicTerm::new(-1.1316126, 0.636717, 348.1074),
    HarmonicTerm::new(1.0896928, 12.844549, 82.6496),
];

/// General precession in longitude. Amplitudes are in arcsec.
pub(super) const PRECESSION_TERMS: [HarmonicTerm; 78] = [
    HarmonicTerm::new(7391.022589, 31.609974, 251.9025),
    HarmonicTerm::new(2555.1526947, 32.620504, 280.8325),
    HarmonicTerm::new(2022.7629188, 24.172203, 128.3057),
    HarmonicTerm::new(-1973.6517951, 0.636717, 348.1074),
    HarmonicTerm::new(1240.2321818, 31.983787, 292.7252),
    HarmonicTerm::new(953.8679112, 3.138886, 165.1686),
    HarmonicTerm::new(-931.7537108, 30.973257, 263.7951),
    HarmonicTerm::new(872.3795383, 44.828336, 15.3747),
    HarmonicTerm::new(606.3544732, 0.991874, 58.5749),
    HarmonicTerm::new(-496.0274038, 0.373813, 40.8226),
    HarmonicTerm::new(456.9608039, 43.668246, 308.4258),
    HarmonicTerm::new(346.946232, 32.246691, 240.0099),
    HarmonicTerm::new(-305.8412902, 30.599444, 222.9725),
    HarmonicTerm::new(249.6173246, 2.147012, 106.5937),
    HarmonicTerm::new(-199.10272, 10.511172, 114.5182),
    HarmonicTerm::new(191.0560889, 42.681324, 268.7809),
    HarmonicTerm::new(-175.2936572, 13.650058, 279.6869),
    HarmonicTerm::new(165.9068833, 0.986922, 39.6448),
    HarmonicTerm::new(161.1285917, 9.874455, 126.4108),
    HarmonicTerm::new(139.7878093, 13.013341, 291.5576),
    HarmonicTerm::new(-133.5228399, 0.262904, 307.2848),
    HarmonicTerm::new(117.0673811, 0.004952, 18.93),
    HarmonicTerm::new(104.6907281, 1.142024, 273.7596),
    HarmonicTerm::new(95.3227476, 63.219948, 143.805),
    HarmonicTerm::new(86.7824524, 0.205021, 191.8927),
    HarmonicTerm::new(86.0857729, 2.151964, 125.5237),
    HarmonicTerm::new(70.5893698, 64.230478, 172.7351),
    HarmonicTerm::new(-69.9719343, 43.836462, 316.7998),
    HarmonicTerm::new(-62.5817473, 47.439436, 319.6024),
    HarmonicTerm::new(61.5450059, 1.384343, 69.7526),
    HarmonicTerm::new(-57.9364011, 7.437771, 123.5968),
    HarmonicTerm::new(57.1899832, 18.829299, 217.6432),
    HarmonicTerm::new(-57.0236109, 9.500642, 85.5882),
    HarmonicTerm::new(-54.2119253, 0.431696, 156.2147),
    HarmonicTerm::new(53.2834147, 1.16009, 66.9489),
    HarmonicTerm::new(52.1223575, 55.782177, 20.2082),
    HarmonicTerm::new(-49.0059908, 12.639528, 250.7568),
    HarmonicTerm::new(-48.3118757, 1.155138, 48.0188),
    HarmonicTerm::new(-45.4191685, 0.168216, 8.3739),
    HarmonicTerm::new(-42.235792, 1.647247, 17.0374),
    HarmonicTerm::new(-34.7971099, 10.884985, 155.3409),
    HarmonicTerm::new(34.4623613, 5.610937, 94.1709),
    HarmonicTerm::new(-33.8356643, 12.658184, 221.112),
    HarmonicTerm::new(33.6689362, 1.01053, 28.93),
    HarmonicTerm::new(-31.2521586, 1.983748, 117.1498),
    HarmonicTerm::new(-30.8798701, 14.023871, 320.5095),
    HarmonicTerm::new(28.4640769, 0.560178, 262.3602),
    HarmonicTerm::new(-27.1960802, 1.273434, 336.2148),
    HarmonicTerm::new(27.0860736, 12.021467, 233.0046),
    HarmonicTerm::new(-26.3437456, 62.583231, 155.6977),
    HarmonicTerm::new(24.725374, 63.593761, 184.6277),
    HarmonicTerm::new(24.6732126, 76.43831, 267.2772),
    HarmonicTerm::new(24.4272733, 4.28091, 78.9281),
    HarmonicTerm::new(24.0127327, 13.218362, 123.4722),
    HarmonicTerm::new(21.7150294, 17.818769, 188.7132),
    HarmonicTerm::new(-21.5375347, 8.359495, 180.1364),
    HarmonicTerm::new(18.1148363, 56.792707, 49.1382),
    HarmonicTerm::new(-16.9603104, 8.448301, 152.5268),
    HarmonicTerm::new(-16.1765215, 1.978796, 98.2198),
    HarmonicTerm::new(15.5567653, 8.863925, 97.4808),
    HarmonicTerm::new(15.4846529, 0.186365, 221.5376),
    HarmonicTerm::new(15.2150632, 8.996212, 168.2438),
    HarmonicTerm::new(14.5047426, 6.771027, 161.1199),
    HarmonicTerm::new(-14.3873316, 45.815258, 55.0196),
    HarmonicTerm::new(13.1351419, 12.002811, 262.6495),
    HarmonicTerm::new(12.8776311, 75.27822, 200.3284),
    HarmonicTerm::new(11.9867234, 65.241008, 201.6651),
    HarmonicTerm::new(11.9385578, 18.870667, 294.6547),
    HarmonicTerm::new(11.7030822, 22.009553, 99.8233),
    HarmonicTerm::new(11.6018181, 64.604291, 213.5577),
    HarmonicTerm::new(-11.2617293, 11.498094, 154.1631),
    HarmonicTerm::new(-10.4664199, 0.578834, 232.7153),
    HarmonicTerm::new(10.433397, 9.237738, 138.3034),
    HarmonicTerm::new(-10.2377466, 49.747842, 204.6609),
    HarmonicTerm::new(10.1934446, 2.147012, 106.5938),
    HarmonicTerm::new(-10.1280191, 1.196895, 250.4676),
    HarmonicTerm::new(10.0289441, 2.133898, 332.3345),
    HarmonicTerm::new(-10.0034259, 0.173168, 27.3039),
];
