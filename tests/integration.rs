//! Testing full programs against the public API, the way an embedding
//! harness would drive the core
use ottanta::{prelude::*, protect};

fn system() -> System {
    let mut sys = System::default();
    sys.cpu.set_sp(0xff00);
    sys.cpu.set_pc(0x0100);
    sys
}

#[test]
fn move_immediate_then_copy() -> Result<()> {
    let mut sys = system();
    sys.load(&[0x3e, 0x42, 0x47], 0x0100); // MVI A, 0x42; MOV B, A
    let time = sys.step()? + sys.step()?;
    assert_eq!(0x42, sys.cpu.a());
    assert_eq!(0x42, sys.cpu.b());
    assert_eq!(0x0103, sys.cpu.pc());
    assert_eq!(12, time);
    Ok(())
}

#[test]
fn call_from_the_top_of_memory() -> Result<()> {
    let mut sys = system();
    sys.cpu.set_sp(0xffff);
    sys.load(&[0xcd, 0x00, 0x02], 0x0100); // CALL 0x0200
    sys.step()?;
    assert_eq!(0x0200, sys.cpu.pc());
    assert_eq!(0xfffd, sys.cpu.sp());
    assert_eq!(Ok(0x03), sys.mem.read(0xfffd));
    assert_eq!(Ok(0x01), sys.mem.read(0xfffe));
    Ok(())
}

#[test]
fn load_wraps_at_the_top_of_memory() {
    let mut ram = Ram::default();
    ram.load(&[0xaa, 0xbb], 0xffff);
    assert_eq!(Ok(0xaa), ram.read(0xffff));
    assert_eq!(Ok(0xbb), ram.read(0x0000));
}

#[test]
fn read_only_range_refuses_writes() -> Result<()> {
    let mut mem = protect! {
        Ram::default(),
        [0x0000..=0x00ff] = Read,
    };
    assert_eq!(Ok(0), mem.read(0x0050));
    assert_eq!(
        Err(Error::AccessViolation { addr: 0x0050, access: Access::Write }),
        mem.write(0x0050, 0xc5)
    );
    // outside every granted range, both directions are denied
    assert!(mem.read(0x0200).is_err());
    assert!(mem.write(0x0200, 0x00).is_err());
    Ok(())
}

/// The memory layout a CP/M-style harness would grant: open low memory for
/// the system vectors, a read/write transient area, and fenced-off
/// system segments above it
#[test]
fn cpm_style_memory_fences() -> Result<()> {
    let mut mem = protect! {
        Ram::default(),
        [0xf200..=0xffff] = None, // BIOS
        [0xe400..=0xf1ff] = Both, // BDOS
        [0xdc00..=0xe3ff] = None, // CCP
        [0x0100..=0xdbff] = Both, // TPA
        [0x0000..=0x00ff] = Read, // vectors
    };
    assert_eq!(5, mem.ranges().len());
    assert!(mem.write(0x0100, 0xc3).is_ok());
    assert!(mem.write(0xe500, 0x00).is_ok());
    assert!(mem.write(0xdc00, 0x00).is_err());
    assert!(mem.read(0xf200).is_err());
    assert!(mem.read(0x0005).is_ok());
    assert!(mem.write(0x0005, 0x00).is_err());

    // a faulting program leaves the CPU inspectable, not poisoned
    let mut cpu = CPU::default();
    cpu.set_pc(0x0100);
    mem.load(&[0x32, 0x00, 0xdc], 0x0100); // STA 0xdc00
    let fault = cpu.step(&mut mem, &mut NullIo);
    assert_eq!(
        Err(Error::AccessViolation { addr: 0xdc00, access: Access::Write }),
        fault
    );
    assert_eq!(0x0103, cpu.pc());
    Ok(())
}

#[test]
fn first_grant_wins_on_overlap() -> Result<()> {
    let mut mem = Protected::new(Ram::default())
        .grant_owned(Range::new(0x1000, 0x1fff, Access::Read)?)
        .grant_owned(Range::new(0x1000, 0x2fff, Access::Both)?);
    assert!(mem.write(0x1800, 0x00).is_err()); // first grant is read-only
    assert!(mem.write(0x2800, 0x00).is_ok()); // second grant still covers the rest
    mem.revoke(0x1000, 0x1fff);
    assert!(mem.write(0x1800, 0x00).is_ok());
    Ok(())
}

#[test]
fn watched_memory_marks_accesses() -> Result<()> {
    let mut cpu = CPU::default();
    let mut mem = Watched::new(Ram::default());
    mem.load(&[0x3a, 0x00, 0x20, 0x32, 0x00, 0x30], 0x0100); // LDA 0x2000; STA 0x3000
    cpu.set_pc(0x0100);
    cpu.step(&mut mem, &mut NullIo)?;
    cpu.step(&mut mem, &mut NullIo)?;

    assert!(mem.was_read(0x0100)); // fetches count as reads
    assert!(mem.was_read(0x2000));
    assert!(!mem.was_written(0x2000));
    assert!(mem.was_written(0x3000));
    assert!(!mem.was_read(0x4000));

    mem.reset_marks();
    assert!(!mem.was_read(0x2000));
    Ok(())
}

#[test]
fn watched_skips_refused_accesses() -> Result<()> {
    let mut mem = Watched::new(protect! {
        Ram::default(),
        [0x0000..=0x00ff] = Read,
    });
    assert!(mem.write(0x0050, 0xc5).is_err());
    assert!(!mem.was_written(0x0050));
    Ok(())
}

/// A CP/M "hello"-style loop driven purely from outside: the harness traps
/// the BDOS entry by watching the program counter, no shim in the core
#[test]
fn external_bdos_trap() -> Result<()> {
    let mut sys = system();
    sys.load(&[0xc9], 0x0005); // RET at the BDOS entry
    #[rustfmt::skip]
    let program = [
        0x0e, 0x02,             // MVI C, 2 (console output)
        0x1e, b'H',             // MVI E, 'H'
        0xcd, 0x05, 0x00,       // CALL 5
        0x76,                   // HLT
    ];
    sys.load(&program, 0x0100);

    let mut printed = vec![];
    loop {
        if sys.cpu.pc() == 0x0005 && sys.cpu.c() == 2 {
            printed.push(sys.cpu.e());
        }
        if sys.mem.read(sys.cpu.pc())? == 0x76 {
            break;
        }
        sys.step()?;
    }
    assert_eq!(vec![b'H'], printed);
    Ok(())
}

#[test]
fn interrupt_reaches_the_system() -> Result<()> {
    let mut sys = system();
    sys.load(&[0xfb, 0x00, 0x00], 0x0100); // EI; NOP; NOP
    assert!(!sys.request_interrupt(0xff)); // not yet enabled
    sys.step()?;
    assert!(sys.request_interrupt(0xff)); // RST 7
    sys.step()?;
    assert_eq!(0x0038, sys.cpu.pc());
    Ok(())
}

#[test]
fn snapshot_and_clear() {
    let mut ram = Ram::default();
    ram.load(&[1, 2, 3], 0x0100);
    let image = ram.snapshot();
    assert_eq!(0x1_0000, image.len());
    assert_eq!([1, 2, 3], image[0x0100..0x0103]);
    ram.clear();
    assert_eq!(Ok(0), ram.read(0x0100));
}
