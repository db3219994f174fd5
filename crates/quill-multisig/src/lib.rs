//! M-of-N multisig wallet state machine for the quill contract platform.
//!
//! A wallet tracks pending transactions and promotes them to executed once
//! a threshold of distinct owner confirmations accumulates. Every operation
//! runs through the authenticator and the authorization gate before it
//! touches wallet state.

pub mod contract;
pub mod state;

pub use contract::{
    create_multisig, confirm_tx, get_wallet, submit_tx, ConfirmTxDto, CreateMultisigDto,
    GetWalletDto, SubmitTxDto, EVENT_MULTISIG_CREATED, EVENT_TX_EXECUTED, EVENT_TX_SUBMITTED,
};
pub use state::{MultisigState, PendingTx};
