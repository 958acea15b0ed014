// tests/request_defaults.rs

use std::time::Duration;

use hyprdesk::exec::{DEFAULT_TIMEOUT_SECS, ExecutionRequest};
use proptest::prelude::*;

fn request_strategy() -> impl Strategy<Value = ExecutionRequest> {
    (
        "[a-z]{1,8}",
        proptest::collection::vec("[a-zA-Z0-9-]{0,6}", 0..4),
        prop_oneof![Just(0u64), 1u64..3600],
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(command, args, timeout, detach, discard)| {
            let mut req = ExecutionRequest::new(command).args(args).timeout_secs(timeout);
            if detach {
                req = req.detached();
            }
            if discard {
                req = req.discard_output();
            }
            req
        })
}

proptest! {
    #[test]
    fn default_fill_is_idempotent(req in request_strategy()) {
        let once = req.clone().with_defaults();
        let twice = once.clone().with_defaults();
        prop_assert_eq!(&once, &twice);
    }

    #[test]
    fn filled_timeout_is_never_zero(req in request_strategy()) {
        let original = req.timeout_secs;
        let filled = req.with_defaults();

        prop_assert!(filled.timeout_secs > 0);
        if original == 0 {
            prop_assert_eq!(filled.timeout_secs, DEFAULT_TIMEOUT_SECS);
        } else {
            prop_assert_eq!(filled.timeout_secs, original);
        }
        prop_assert_eq!(filled.timeout(), Duration::from_secs(filled.timeout_secs));
    }

    #[test]
    fn default_fill_only_touches_the_timeout(req in request_strategy()) {
        let filled = req.clone().with_defaults();

        prop_assert_eq!(&filled.command, &req.command);
        prop_assert_eq!(&filled.args, &req.args);
        prop_assert_eq!(filled.detach, req.detach);
        prop_assert_eq!(filled.discard_stdout, req.discard_stdout);
        prop_assert_eq!(filled.discard_stderr, req.discard_stderr);
    }
}
