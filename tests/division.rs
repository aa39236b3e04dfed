use bigradix::{div_fractional, divmod, Error, Number};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn division() {
    sub_test("test_divmod_against_i64", test_divmod_against_i64);
    sub_test("test_divmod_signs", test_divmod_signs);
    sub_test("test_division_by_zero", test_division_by_zero);
    sub_test("test_fractional_ten_thirds", test_fractional_ten_thirds);
    sub_test("test_fractional_terminates_early", test_fractional_terminates_early);
    sub_test("test_fractional_scales_both_operands", test_fractional_scales_both_operands);
}

fn sub_test<F: FnOnce()>(name: &str, f: F) {
    println!("Running {}", name);
    f();
}

fn n(value: i64, base: u64) -> Number {
    Number::from_integer(value, base).unwrap()
}

fn test_divmod_against_i64() {
    let seed: [u8; 32] = [5; 32];
    let mut rng: ChaCha8Rng = ChaCha8Rng::from_seed(seed);
    for base in [2u64, 10, 12, 1 << 16] {
        for _ in 0..200 {
            let x: i64 = rng.random_range(-1_000_000_000..=1_000_000_000);
            let mut y: i64 = rng.random_range(-10_000..=10_000);
            if y == 0 {
                y = 1;
            }
            let mut q: Number = Number::new(base).unwrap();
            let mut r: Number = Number::new(base).unwrap();
            divmod(&mut q, &mut r, &n(x, base), &n(y, base)).unwrap();
            // i64 division truncates toward zero with the remainder taking
            // the dividend's sign, same contract as divmod
            assert_eq!(q.to_integer().unwrap(), x / y, "{} / {} in base {}", x, y, base);
            assert_eq!(r.to_integer().unwrap(), x % y, "{} % {} in base {}", x, y, base);
        }
    }
}

fn test_divmod_signs() {
    let cases: [(i64, i64); 4] = [(7, 3), (-7, 3), (7, -3), (-7, -3)];
    for (x, y) in cases {
        let mut q: Number = Number::new(10).unwrap();
        let mut r: Number = Number::new(10).unwrap();
        divmod(&mut q, &mut r, &n(x, 10), &n(y, 10)).unwrap();
        assert_eq!(q.to_integer().unwrap(), x / y);
        assert_eq!(r.to_integer().unwrap(), x % y);
    }
}

fn test_division_by_zero() {
    let mut q: Number = Number::new(10).unwrap();
    let mut r: Number = Number::new(10).unwrap();
    assert_eq!(divmod(&mut q, &mut r, &n(1, 10), &n(0, 10)), Err(Error::DivisionByZero));
    let mut out: Number = Number::new(10).unwrap();
    assert_eq!(div_fractional(&mut out, &n(1, 10), &n(0, 10), 4), Err(Error::DivisionByZero));

    // a divisor that is pure fraction has an empty integer part
    let mut half: Number = Number::new(10).unwrap();
    div_fractional(&mut half, &n(1, 10), &n(2, 10), 1).unwrap();
    assert_eq!(divmod(&mut q, &mut r, &n(1, 10), &half), Err(Error::DivisionByZero));
}

fn test_fractional_ten_thirds() {
    let mut out: Number = Number::new(10).unwrap();
    div_fractional(&mut out, &n(10, 10), &n(3, 10), 10).unwrap();
    assert_eq!(format!("{}", out), "3.3333333333");
    assert_eq!(out.min_exponent(), -10);
    assert_eq!(out.max_exponent(), 0);
}

fn test_fractional_terminates_early() {
    let mut out: Number = Number::new(10).unwrap();
    div_fractional(&mut out, &n(1, 10), &n(8, 10), 10).unwrap();
    // 0.125 exactly; no trailing zeros are produced
    assert_eq!(format!("{}", out), "0.125");
    assert_eq!(out.min_exponent(), -3);

    div_fractional(&mut out, &n(-10, 10), &n(4, 10), 5).unwrap();
    assert_eq!(format!("{}", out), "-2.5");
}

fn test_fractional_scales_both_operands() {
    // 2.5 / 0.5 = 5 exactly; only same-factor scaling of both operands
    // keeps the quotient intact
    let mut a: Number = Number::new(10).unwrap();
    div_fractional(&mut a, &n(25, 10), &n(10, 10), 2).unwrap();
    let mut b: Number = Number::new(10).unwrap();
    div_fractional(&mut b, &n(5, 10), &n(10, 10), 2).unwrap();
    let mut out: Number = Number::new(10).unwrap();
    div_fractional(&mut out, &a, &b, 4).unwrap();
    assert_eq!(out.to_integer().unwrap(), 5);
    assert_eq!(out.precision(), 0);

    // 0.3 / 0.2 = 1.5
    let mut c: Number = Number::new(10).unwrap();
    div_fractional(&mut c, &n(3, 10), &n(10, 10), 1).unwrap();
    let mut d: Number = Number::new(10).unwrap();
    div_fractional(&mut d, &n(2, 10), &n(10, 10), 1).unwrap();
    div_fractional(&mut out, &c, &d, 4).unwrap();
    assert_eq!(format!("{}", out), "1.5");
}
