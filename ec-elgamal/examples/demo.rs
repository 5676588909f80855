use ec_elgamal::{encrypt, Curve, CurveParameters, ElGamal, Point};
use num_bigint::BigInt;
use rand_core::OsRng;
use structopt::StructOpt;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(StructOpt)]
struct Opt {
    #[structopt(long, default_value = "1", help = "curve coefficient a")]
    a: i64,
    #[structopt(long, default_value = "1", help = "curve coefficient b")]
    b: i64,
    #[structopt(long, default_value = "1000003", help = "field characteristic")]
    p: u64,
    #[structopt(long, default_value = "1", help = "field extension degree")]
    n: u32,
    #[structopt(long, help = "json file with curve parameters, overrides a, b, p and n")]
    params: Option<PathBuf>,
    #[structopt(long, help = "affine x coordinate of the generator")]
    gx: Option<i64>,
    #[structopt(long, help = "affine y coordinate of the generator")]
    gy: Option<i64>,
    #[structopt(long, default_value = "101", help = "integer to encrypt")]
    message: i64,
}

fn arithmetic(curve: &Arc<Curve>, rng: &mut OsRng) -> Result<(), Box<dyn Error>> {
    let p1 = curve.random_point(rng)?;
    let mut p2 = curve.random_point(rng)?;
    while p1 == p2 {
        p2 = curve.random_point(rng)?;
    }
    println!("p1 = {}", p1);
    println!("p2 = {}", p2);
    println!("p1 + p2 = {}", (&p1 + &p2)?);
    println!("p1 - p2 = {}", (&p1 - &p2)?);
    println!("[2]p1 = {}", &p1 * 2);
    println!("[3]p1 = {}", &p1 * 3);
    println!("[345678123]p1 = {}", &p1 * 345_678_123);
    println!("order of p1: {}", p1.order_bsgs()?);
    Ok(())
}

fn elgamal(curve: &Arc<Curve>, rng: &mut OsRng, opt: &Opt) -> Result<(), Box<dyn Error>> {
    let generator = match (opt.gx, opt.gy) {
        (Some(x), Some(y)) => Some(Point::new(curve, x, y, 1)?),
        _ => None,
    };
    let elgamal = ElGamal::new(rng, curve, generator, None, None)?;
    println!("G = {}", elgamal.generator());
    println!("public key = {}", elgamal.public_key());
    println!("private key = {}", elgamal.private_key());

    let message_point = curve.map_to_point(&BigInt::from(opt.message))?;
    println!("message: {}", opt.message);
    println!("message point: {}", message_point);

    let (c1, c2) = encrypt(
        rng,
        curve,
        elgamal.public_key(),
        elgamal.generator(),
        &message_point,
    )?;
    println!("c1 = {}", c1);
    println!("c2 = {}", c2);

    let decrypted_point = elgamal.decrypt(&c1, &c2)?;
    println!("decrypted point: {}", decrypted_point);
    println!("decrypted: {}", curve.map_from_point(&decrypted_point)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let opt = Opt::from_args();
    let params = match &opt.params {
        Some(path) => serde_json::from_reader(File::open(path)?)?,
        None => CurveParameters::new(opt.a, opt.b, opt.p, opt.n),
    };
    let curve = params.build()?;
    println!("curve: {}", curve);

    let mut rng = OsRng;
    arithmetic(&curve, &mut rng)?;
    elgamal(&curve, &mut rng, &opt)
}
