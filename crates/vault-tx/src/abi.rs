//! Relayer library ABI bindings

use alloy::sol;

sol! {
    /// One hop of a vault batch swap
    #[derive(Debug, PartialEq, Eq)]
    struct BatchSwapStep {
        bytes32 poolId;
        uint256 assetInIndex;
        uint256 assetOutIndex;
        uint256 amount;
        bytes userData;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct FundManagement {
        address sender;
        bool fromInternalBalance;
        address recipient;
        bool toInternalBalance;
    }

    /// Stores the amount of `assets[index]` into chained slot `key`
    #[derive(Debug, PartialEq, Eq)]
    struct OutputReference {
        uint256 index;
        uint256 key;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ExitPoolRequest {
        address[] assets;
        uint256[] minAmountsOut;
        bytes userData;
        bool toInternalBalance;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct JoinPoolRequest {
        address[] assets;
        uint256[] maxAmountsIn;
        bytes userData;
        bool fromInternalBalance;
    }

    /// Vault actions exposed by the relayer library
    interface IVaultActions {
        function batchSwap(
            uint8 kind,
            BatchSwapStep[] swaps,
            address[] assets,
            FundManagement funds,
            int256[] limits,
            uint256 deadline,
            uint256 value,
            OutputReference[] outputReferences
        ) external payable;

        function exitPool(
            bytes32 poolId,
            uint8 kind,
            address sender,
            address recipient,
            ExitPoolRequest request,
            OutputReference[] outputReferences
        ) external payable;

        function joinPool(
            bytes32 poolId,
            uint8 kind,
            address sender,
            address recipient,
            JoinPoolRequest request,
            uint256 value,
            uint256 outputReference
        ) external payable;
    }

    /// Yield-bearing token wrappers
    interface IWrapperActions {
        function wrapAaveDynamicToken(
            address staticToken,
            address sender,
            address recipient,
            uint256 amount,
            bool fromUnderlying,
            uint256 outputReference
        ) external payable;

        function unwrapAaveStaticToken(
            address staticToken,
            address sender,
            address recipient,
            uint256 amount,
            bool toUnderlying,
            uint256 outputReference
        ) external payable;

        function wrapYearnVaultToken(
            address vaultToken,
            address sender,
            address recipient,
            uint256 amount,
            uint256 outputReference
        ) external payable;

        function unwrapYearnVaultToken(
            address vaultToken,
            address sender,
            address recipient,
            uint256 amount,
            uint256 outputReference
        ) external payable;

        function booMirrorWorldEnter(
            address sender,
            address recipient,
            uint256 amount,
            uint256 outputReference
        ) external payable;

        function booMirrorWorldLeave(
            address sender,
            address recipient,
            uint256 amount,
            uint256 outputReference
        ) external payable;
    }

    /// Share-token bars and farm staking
    interface IStakingActions {
        function fBeetsBarEnter(
            address sender,
            address recipient,
            uint256 amount,
            uint256 outputReference
        ) external payable;

        function fBeetsBarLeave(
            address sender,
            address recipient,
            uint256 amount,
            uint256 outputReference
        ) external payable;

        function xSonarBarEnter(
            address sender,
            address recipient,
            uint256 amount,
            uint256 outputReference
        ) external payable;

        function xSonarBarLeave(
            address sender,
            address recipient,
            uint256 amount,
            uint256 outputReference
        ) external payable;

        function masterChefDeposit(
            address sender,
            address recipient,
            address token,
            uint256 pid,
            uint256 amount,
            uint256 outputReference
        ) external payable;

        function masterChefWithdraw(
            address recipient,
            uint256 pid,
            uint256 amount,
            uint256 outputReference
        ) external payable;
    }

    /// Relay entry point
    interface IBatchRelayer {
        function multicall(bytes[] data) external payable returns (bytes[] results);
    }
}
