use crate::domain::DrivenPortError;
use anyhow::anyhow;

/// Connectivity represents the "connected" state of a fake gateway and provides
/// common behavior for returning an error if the gateway is configured to be offline.
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl Connectivity {
    /// Return an error if connectivity is in a "disconnected" state
    pub fn blow_up_if_disconnected(&self) -> Result<(), DrivenPortError> {
        match self {
            Self::Connected => Ok(()),
            Self::Disconnected => Err(DrivenPortError::CommsFailure(anyhow!(
                "could not reach the task backend!"
            ))),
        }
    }
}

/// FakeImplementation stands in for one function of a mocked port. It records the arguments
/// of every call and hands back a preconfigured result.
///
/// * [Args] represents the arguments passed to the function that should be captured on a call
/// * [Ret] represents the type of the function's return value
///
/// # Example
///
/// ```ignore
/// struct FakeSessionGateway {
///     who_am_i_result: FakeImplementation<(), Result<User, DrivenPortError>>,
/// }
///
/// impl SessionReader for Mutex<FakeSessionGateway> {
///     async fn who_am_i(&self, _: &impl ExternalConnectivity) -> Result<User, DrivenPortError> {
///         let mut locked = self.lock().unwrap();
///         locked.who_am_i_result.save_arguments(());
///         locked.who_am_i_result.return_value_result()
///     }
/// }
/// ```
pub struct FakeImplementation<Args, Ret> {
    saved_arguments: Vec<Args>,
    return_value: Option<Ret>,
}

impl<Args, Ret> FakeImplementation<Args, Ret> {
    pub fn new() -> FakeImplementation<Args, Ret> {
        FakeImplementation {
            saved_arguments: Vec::new(),
            return_value: None,
        }
    }

    /// Saves arguments from a single invocation of the FakeImplementation
    pub fn save_arguments(&mut self, arguments: Args) {
        self.saved_arguments.push(arguments)
    }

    /// Returns the list of arguments passed on every call to this FakeImplementation
    pub fn calls(&self) -> &[Args] {
        self.saved_arguments.as_slice()
    }
}

impl<Args, Success, Fail> FakeImplementation<Args, Result<Success, Fail>>
where
    Success: Clone,
    Fail: Clone,
{
    /// Set the result that should be returned when this FakeImplementation is invoked.
    pub fn set_returned_result(&mut self, return_value: Result<Success, Fail>) {
        self.return_value = Some(return_value);
    }

    /// Retrieve the result that should be returned when this FakeImplementation is invoked
    pub fn return_value_result(&self) -> Result<Success, Fail> {
        match self.return_value {
            Some(Ok(ref ok_result)) => Ok(ok_result.clone()),
            Some(Err(ref err)) => Err(err.clone()),
            None => panic!("Tried to return from a function where the return value wasn't set!"),
        }
    }
}
