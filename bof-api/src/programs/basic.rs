//! Beacon API example
//!
//! Prints a greeting, the current process id and, when it can be retrieved, the
//! name of the current user.

use crate::api::{BeaconApi, SystemInfo};
use crate::types::{CallbackType, UNLEN};

/// Entry point
pub fn go<B, S>(beacon: &B, system: &S)
where
    B: BeaconApi + ?Sized,
    S: SystemInfo + ?Sized,
{
    beacon.printf(CallbackType::Output, "Hello, World!");

    let pid = system.current_process_id();
    beacon.printf(
        CallbackType::Output,
        &format!("Current process id is {}", pid),
    );

    let mut username = [0u8; UNLEN + 1];
    if system.user_name(&mut username) {
        let name = nul_terminated(&username);
        beacon.printf(
            CallbackType::Output,
            &format!("Your username is {}", String::from_utf8_lossy(name)),
        );
    }
}

/// Bytes before the first NUL, or the whole buffer if there is none
fn nul_terminated(buffer: &[u8]) -> &[u8] {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    &buffer[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockBeaconApi, MockSystemInfo};
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn system_with(pid: u32, user: Option<&'static str>) -> MockSystemInfo {
        let mut system = MockSystemInfo::new();
        system.expect_current_process_id().times(1).return_const(pid);
        system.expect_user_name().times(1).returning(move |buffer| {
            // Callers pass a zeroed UNLEN + 1 byte buffer.
            assert_eq!(buffer.len(), UNLEN + 1);
            assert!(buffer.iter().all(|&b| b == 0));
            match user {
                Some(name) => {
                    buffer[..name.len()].copy_from_slice(name.as_bytes());
                    true
                }
                None => false,
            }
        });
        system
    }

    #[test]
    fn test_prints_greeting_pid_and_username_in_order() {
        let mut seq = Sequence::new();
        let mut beacon = MockBeaconApi::new();
        beacon
            .expect_printf()
            .with(eq(CallbackType::Output), eq("Hello, World!"))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        beacon
            .expect_printf()
            .with(eq(CallbackType::Output), eq("Current process id is 4242"))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        beacon
            .expect_printf()
            .with(eq(CallbackType::Output), eq("Your username is alice"))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        go(&beacon, &system_with(4242, Some("alice")));
    }

    #[test]
    fn test_username_failure_skips_third_print() {
        let mut beacon = MockBeaconApi::new();
        beacon
            .expect_printf()
            .withf(|_, message| message == "Hello, World!")
            .times(1)
            .return_const(());
        beacon
            .expect_printf()
            .withf(|_, message| message == "Current process id is 7")
            .times(1)
            .return_const(());
        beacon
            .expect_printf()
            .withf(|_, message| message.starts_with("Your username is"))
            .never();

        go(&beacon, &system_with(7, None));
    }

    #[test]
    fn test_greeting_printed_exactly_once() {
        let mut beacon = MockBeaconApi::new();
        beacon
            .expect_printf()
            .withf(|_, message| message == "Hello, World!")
            .times(1)
            .return_const(());
        beacon
            .expect_printf()
            .withf(|callback, message| {
                *callback == CallbackType::Output && message != "Hello, World!"
            })
            .times(2)
            .return_const(());

        go(&beacon, &system_with(u32::MAX, Some("svc")));
    }

    #[test]
    fn test_nul_terminated() {
        assert_eq!(nul_terminated(b"bob\0\0\0"), b"bob");
        assert_eq!(nul_terminated(b"\0bob"), b"");
        assert_eq!(nul_terminated(b"full"), b"full");
    }
}
