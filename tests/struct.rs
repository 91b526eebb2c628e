//! Testing methods on ottanta's structs
use ottanta::prelude::*;

#[test]
fn system() {
    let sys = System::<Ram, NullIo>::default(); // Default
    let sys2 = sys.clone(); // Clone
    assert_eq!(sys, sys2); // PartialEq
    println!("{sys:?}"); // Debug
}

#[test]
fn cpu() {
    let cpu = CPU::default();
    let cpu2 = cpu.clone();
    assert_eq!(cpu, cpu2);
    println!("{cpu:?}");
}

#[test]
fn ram() {
    let ram = Ram::default();
    let ram2 = ram.clone();
    assert_eq!(ram, ram2);
}

#[test]
fn error() {
    let error = Error::AccessViolation { addr: 0xdc00, access: Access::Write };
    assert_eq!("write access violation at dc00", error.to_string());
    let error = Error::InvalidRange { lower: 0x00ff, upper: 0x0000 };
    assert_eq!("invalid permission range 00ff..=0000", error.to_string());
    println!("{error} {error:?}");
}

#[test]
fn access_display() {
    assert_eq!("no-access", Access::None.to_string());
    assert_eq!("read", Access::Read.to_string());
    assert_eq!("write", Access::Write.to_string());
    assert_eq!("read/write", Access::Both.to_string());
}

#[test]
fn range_accessors() -> Result<()> {
    let range = Range::new(0x0100, 0xdbff, Access::Both)?;
    assert_eq!(0x0100, range.lower());
    assert_eq!(0xdbff, range.upper());
    assert_eq!(Access::Both, range.access());
    assert!(range.contains(0x0100));
    assert!(range.contains(0xdbff));
    assert!(!range.contains(0x00ff));
    Ok(())
}

#[test]
fn wrappers_unwrap() {
    let ram = Ram::default().load_owned(&[0xc5], 0x0100);
    let mut inner = Watched::new(Protected::new(ram)).into_inner().into_inner();
    assert_eq!(Ok(0xc5), inner.read(0x0100));
}
